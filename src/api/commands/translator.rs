use std::sync::Arc;

use tauri::{AppHandle, State};
use tauri_plugin_clipboard_manager::ClipboardExt;

use crate::core::languages;
use crate::session::PopupSession;
use crate::shared::error::{AppError, AppResult};

/// The popup's input field changed. Feeds the debounced pipeline; results
/// come back asynchronously as `translator://result` events.
#[tauri::command]
pub async fn text_changed(session: State<'_, Arc<PopupSession>>, text: String) -> AppResult<()> {
    session.text_changed(&text);
    Ok(())
}

/// Enter pressed in the input field: translate immediately instead of
/// waiting for the input to settle.
#[tauri::command]
pub async fn translate_now(session: State<'_, Arc<PopupSession>>, text: String) -> AppResult<()> {
    session.translate_now(&text);
    Ok(())
}

/// Human-readable name for a detected language code, for the info line.
#[tauri::command]
pub fn language_display_name(code: String) -> String {
    languages::display_name(&code)
}

/// Copy the current translation to the system clipboard.
#[tauri::command]
pub fn copy_translation(app: AppHandle, text: String) -> AppResult<()> {
    app.clipboard()
        .write_text(text)
        .map_err(|e| AppError::System(format!("Clipboard write failed: {}", e)))
}
