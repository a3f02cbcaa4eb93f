//! Popup geometry rules.

/// Smallest height the popup grows to once a result is shown.
pub const RESULT_MIN_HEIGHT: u32 = 160;

/// Height of everything around the result text (input row, info line, padding).
pub const RESULT_CHROME_HEIGHT: u32 = 90;

/// Height the popup should have for a result pane of `content_height` pixels.
/// `None` collapses back to the input-only base height.
pub fn popup_height(base_height: u32, content_height: Option<u32>) -> u32 {
    match content_height {
        Some(content) => (RESULT_CHROME_HEIGHT + content).max(RESULT_MIN_HEIGHT),
        None => base_height,
    }
}

/// Default popup position: horizontally centered, vertically at one third of
/// the screen.
pub fn default_position(screen_width: u32, screen_height: u32, window_width: u32) -> (u32, u32) {
    let x = screen_width.saturating_sub(window_width) / 2;
    let y = screen_height / 3;
    (x, y)
}
