//! Session/visibility state machine for the popup window.
//!
//! Pure logic: events go in, side-effect directives come out, and the shell
//! applies them to the real window. Showing fades the window in over fixed
//! ticks; hiding is instantaneous.

use std::time::Duration;

/// Opacity the fade-in ramps up to.
pub const OPACITY_CEILING: f64 = 0.95;

/// Opacity gained per fade tick.
pub const OPACITY_STEP: f64 = 0.15;

/// Interval between fade ticks.
pub const FADE_TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Delay before re-checking focus after a focus-loss signal. Transient focus
/// changes (e.g. clicking the copy affordance) must not hide the window.
pub const FOCUS_RECHECK_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityState {
    Hidden,
    Showing,
    Visible,
    Hiding,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisibilityEvent {
    /// Global hotkey or tray toggle.
    HotkeyToggle,
    Escape,
    /// The window reported losing input focus (may be transient).
    FocusLost,
    /// Result of the delayed focus poll.
    FocusRecheck { focused: bool },
    /// One step of the fade-in animation elapsed.
    FadeTick,
}

/// Directives for the shell. Order matters; apply them in sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    /// Clear input, result, and anything in flight from the previous session.
    ClearSession,
    /// Move the window back to its default centered location.
    ResetPosition,
    ShowWindow,
    SetOpacity(f64),
    /// Ask the OS for foreground focus. Emitted both at show time and at
    /// ramp completion, since a single request may be preempted.
    RequestFocus,
    ScheduleFadeTick,
    ScheduleFocusRecheck,
    HideWindow,
}

pub struct VisibilityMachine {
    state: VisibilityState,
    opacity: f64,
}

impl VisibilityMachine {
    pub fn new() -> Self {
        Self {
            state: VisibilityState::Hidden,
            opacity: 0.0,
        }
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn handle(&mut self, event: VisibilityEvent) -> Vec<SideEffect> {
        use VisibilityEvent::*;
        use VisibilityState::*;

        match (self.state, event) {
            (Hidden, HotkeyToggle) => {
                self.state = Showing;
                self.opacity = 0.0;
                vec![
                    SideEffect::ClearSession,
                    SideEffect::ResetPosition,
                    SideEffect::SetOpacity(0.0),
                    SideEffect::ShowWindow,
                    SideEffect::RequestFocus,
                    SideEffect::ScheduleFadeTick,
                ]
            }
            (Showing, FadeTick) => {
                self.opacity += OPACITY_STEP;
                if self.opacity >= OPACITY_CEILING {
                    self.opacity = OPACITY_CEILING;
                    self.state = Visible;
                    vec![SideEffect::SetOpacity(OPACITY_CEILING), SideEffect::RequestFocus]
                } else {
                    vec![SideEffect::SetOpacity(self.opacity), SideEffect::ScheduleFadeTick]
                }
            }
            (Showing | Visible, HotkeyToggle) | (Showing | Visible, Escape) => self.hide(),
            (Showing | Visible, FocusLost) => vec![SideEffect::ScheduleFocusRecheck],
            (Showing | Visible, FocusRecheck { focused }) => {
                if focused {
                    Vec::new()
                } else {
                    self.hide()
                }
            }
            // Stray ticks, rechecks, and focus events while hidden are noise.
            _ => Vec::new(),
        }
    }

    /// Teardown is instantaneous: the state passes through `Hiding` and lands
    /// on `Hidden` within the same event.
    fn hide(&mut self) -> Vec<SideEffect> {
        self.state = VisibilityState::Hiding;
        self.opacity = 0.0;
        self.state = VisibilityState::Hidden;
        vec![SideEffect::HideWindow]
    }
}

impl Default for VisibilityMachine {
    fn default() -> Self {
        Self::new()
    }
}
