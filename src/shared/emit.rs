use tauri::{AppHandle, Emitter};

use super::events::AppEvent;

/// Emit an application event to all windows.
pub fn emit_event(app: &AppHandle, event: AppEvent) {
    match &event {
        AppEvent::TranslationReady(delivery) => {
            if let Err(e) = app.emit("translator://result", delivery) {
                eprintln!("Failed to emit translation result: {}", e);
            }
        }
        AppEvent::TranslationCleared => {
            if let Err(e) = app.emit("translator://cleared", ()) {
                eprintln!("Failed to emit translation cleared: {}", e);
            }
        }
        AppEvent::SessionReset => {
            if let Err(e) = app.emit("session://reset", ()) {
                eprintln!("Failed to emit session reset: {}", e);
            }
        }
        AppEvent::SettingsUpdated(settings) => {
            if let Err(e) = app.emit("settings://update", settings) {
                eprintln!("Failed to emit settings update: {}", e);
            }
        }
    }
}
