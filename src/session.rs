//! Popup session: wires the visibility machine and the translate coordinator
//! to the real Tauri window.
//!
//! The machine decides, this module executes. Every hotkey press, escape, and
//! focus change is funneled through [`PopupSession::dispatch`], which applies
//! the returned side effects in order.

use std::sync::{Arc, Mutex};

use tauri::{AppHandle, LogicalPosition, LogicalSize, Manager, WebviewWindow};

use crate::config;
use crate::core::coordinator::{Delivery, ResultSink, TranslateCoordinator};
use crate::core::gateway::{GoogleBackend, TranslationGateway};
use crate::core::visibility::{
    SideEffect, VisibilityEvent, VisibilityMachine, FADE_TICK_INTERVAL, FOCUS_RECHECK_DELAY,
};
use crate::shared::emit::emit_event;
use crate::shared::error::AppResult;
use crate::shared::events::AppEvent;
use crate::shared::settings::AppSettings;
use crate::system::window::effects;

pub const POPUP_LABEL: &str = "popup";

/// Forwards coordinator output to the webview as events.
pub struct EventSink {
    app: AppHandle,
}

impl ResultSink for EventSink {
    fn on_cleared(&self) {
        emit_event(&self.app, AppEvent::TranslationCleared);
    }

    fn on_delivery(&self, delivery: Delivery) {
        emit_event(&self.app, AppEvent::TranslationReady(delivery));
    }
}

pub struct PopupSession {
    app: AppHandle,
    settings: AppSettings,
    machine: Mutex<VisibilityMachine>,
    coordinator: TranslateCoordinator<GoogleBackend, EventSink>,
}

impl PopupSession {
    pub fn new(app: AppHandle, settings: AppSettings) -> AppResult<Arc<Self>> {
        let backend = GoogleBackend::new()?;
        let gateway = TranslationGateway::new(backend, settings.primary_language.clone());
        let coordinator = TranslateCoordinator::new(gateway, EventSink { app: app.clone() });

        Ok(Arc::new(Self {
            app,
            settings,
            machine: Mutex::new(VisibilityMachine::new()),
            coordinator,
        }))
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Raw input change from the popup's text field.
    pub fn text_changed(&self, text: &str) {
        self.coordinator.text_changed(text);
    }

    /// Enter pressed; translate the current text without waiting out the
    /// quiet period.
    pub fn translate_now(&self, text: &str) {
        self.coordinator.translate_now(text);
    }

    pub fn toggle(self: &Arc<Self>) {
        self.dispatch(VisibilityEvent::HotkeyToggle);
    }

    pub fn escape(self: &Arc<Self>) {
        self.dispatch(VisibilityEvent::Escape);
    }

    pub fn focus_lost(self: &Arc<Self>) {
        self.dispatch(VisibilityEvent::FocusLost);
    }

    /// Resize the popup for a result pane of `content_height` pixels; `None`
    /// collapses back to the input-only height.
    pub fn resize_for_result(&self, content_height: Option<u32>) {
        let Some(window) = self.window() else { return };
        let height = config::popup_height(self.settings.window_height, content_height);
        let size = LogicalSize::new(self.settings.window_width as f64, height as f64);
        if let Err(e) = window.set_size(size) {
            eprintln!("[Session] Failed to resize popup: {}", e);
        }
    }

    fn dispatch(self: &Arc<Self>, event: VisibilityEvent) {
        let effects = {
            let mut machine = match self.machine.lock() {
                Ok(machine) => machine,
                Err(poisoned) => poisoned.into_inner(),
            };
            machine.handle(event)
        };

        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(self: &Arc<Self>, effect: SideEffect) {
        let Some(window) = self.window() else {
            eprintln!("[Session] Popup window is gone");
            return;
        };

        match effect {
            SideEffect::ClearSession => {
                self.coordinator.reset();
                emit_event(&self.app, AppEvent::SessionReset);
            }
            SideEffect::ResetPosition => self.reset_position(&window),
            SideEffect::ShowWindow => {
                if let Err(e) = window.show() {
                    eprintln!("[Session] Failed to show popup: {}", e);
                }
            }
            SideEffect::SetOpacity(opacity) => effects::set_window_opacity(&window, opacity),
            SideEffect::RequestFocus => {
                if let Err(e) = window.set_focus() {
                    eprintln!("[Session] Failed to focus popup: {}", e);
                }
                effects::force_foreground(&window);
            }
            SideEffect::ScheduleFadeTick => {
                let session = Arc::clone(self);
                tauri::async_runtime::spawn(async move {
                    tokio::time::sleep(FADE_TICK_INTERVAL).await;
                    session.dispatch(VisibilityEvent::FadeTick);
                });
            }
            SideEffect::ScheduleFocusRecheck => {
                let session = Arc::clone(self);
                tauri::async_runtime::spawn(async move {
                    tokio::time::sleep(FOCUS_RECHECK_DELAY).await;
                    let focused = session
                        .window()
                        .and_then(|w| w.is_focused().ok())
                        .unwrap_or(false);
                    session.dispatch(VisibilityEvent::FocusRecheck { focused });
                });
            }
            SideEffect::HideWindow => {
                if let Err(e) = window.hide() {
                    eprintln!("[Session] Failed to hide popup: {}", e);
                }
            }
        }
    }

    /// Shrink back to the input-only size and center at one third of the
    /// primary screen.
    fn reset_position(&self, window: &WebviewWindow) {
        let size = LogicalSize::new(
            self.settings.window_width as f64,
            self.settings.window_height as f64,
        );
        if let Err(e) = window.set_size(size) {
            eprintln!("[Session] Failed to reset popup size: {}", e);
        }

        match window.primary_monitor() {
            Ok(Some(monitor)) => {
                let scale = monitor.scale_factor();
                let screen = monitor.size().to_logical::<u32>(scale);
                let (x, y) = config::default_position(
                    screen.width,
                    screen.height,
                    self.settings.window_width,
                );
                if let Err(e) = window.set_position(LogicalPosition::new(x as f64, y as f64)) {
                    eprintln!("[Session] Failed to position popup: {}", e);
                }
            }
            Ok(None) => eprintln!("[Session] No primary monitor, keeping last position"),
            Err(e) => eprintln!("[Session] Failed to query monitor: {}", e),
        }
    }

    fn window(&self) -> Option<WebviewWindow> {
        self.app.get_webview_window(POPUP_LABEL)
    }
}
