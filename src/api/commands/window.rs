use std::sync::Arc;

use tauri::State;

use crate::session::PopupSession;

/// Escape pressed in the webview; hide the popup.
#[tauri::command]
pub fn hide_popup(session: State<'_, Arc<PopupSession>>) {
    session.inner().escape();
}

/// The frontend measured its result pane; grow or shrink the window to fit.
#[tauri::command]
pub fn resize_for_result(session: State<'_, Arc<PopupSession>>, content_height: Option<u32>) {
    session.resize_for_result(content_height);
}
