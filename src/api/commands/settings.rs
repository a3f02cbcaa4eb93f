use std::sync::Arc;

use serde::Serialize;
use tauri::{AppHandle, Manager};

use crate::session::PopupSession;
use crate::shared::emit::emit_event;
use crate::shared::error::{AppError, AppResult};
use crate::shared::events::AppEvent;
use crate::shared::settings::AppSettings;

/// Choices offered by the first-run wizard.
#[derive(Debug, Clone, Serialize)]
pub struct SetupOptions {
    pub languages: Vec<Choice>,
    pub hotkeys: Vec<Choice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Choice {
    pub label: String,
    pub value: String,
}

fn choice(label: &str, value: &str) -> Choice {
    Choice {
        label: label.to_string(),
        value: value.to_string(),
    }
}

fn language_choices() -> Vec<Choice> {
    vec![
        choice("Türkçe", "tr"),
        choice("English", "en"),
        choice("Deutsch", "de"),
        choice("Français", "fr"),
        choice("Español", "es"),
        choice("Italiano", "it"),
        choice("Русский", "ru"),
        choice("日本語", "ja"),
        choice("한국어", "ko"),
        choice("中文", "zh-cn"),
    ]
}

fn hotkey_choices() -> Vec<Choice> {
    vec![
        choice("Ctrl + Space", "ctrl+space"),
        choice("Ctrl + Shift + T", "ctrl+shift+t"),
        choice("Alt + T", "alt+t"),
        choice("Ctrl + Alt + T", "ctrl+alt+t"),
        choice("Ctrl + Q", "ctrl+q"),
    ]
}

/// Current settings. Falls back to the on-disk file (or defaults) when the
/// main session is not up yet, i.e. while the setup wizard is open.
#[tauri::command]
pub async fn get_settings(app: AppHandle) -> AppSettings {
    match app.try_state::<Arc<PopupSession>>() {
        Some(session) => session.settings().clone(),
        None => AppSettings::load().await,
    }
}

#[tauri::command]
pub fn setup_options() -> SetupOptions {
    SetupOptions {
        languages: language_choices(),
        hotkeys: hotkey_choices(),
    }
}

/// First-run wizard finished: persist the choices, start the main session,
/// and close the wizard window.
#[tauri::command]
pub async fn complete_setup(
    app: AppHandle,
    hotkey: String,
    primary_language: String,
) -> AppResult<()> {
    if !hotkey_choices().iter().any(|c| c.value == hotkey) {
        return Err(AppError::Validation(format!("Unknown hotkey: {}", hotkey)));
    }
    if !language_choices().iter().any(|c| c.value == primary_language) {
        return Err(AppError::Validation(format!(
            "Unknown language: {}",
            primary_language
        )));
    }

    let settings = AppSettings {
        hotkey,
        primary_language,
        ..AppSettings::default()
    };
    settings.save().await?;
    emit_event(&app, AppEvent::SettingsUpdated(settings.clone()));

    crate::bootstrap_main(&app, settings)?;

    if let Some(window) = app.get_webview_window("setup") {
        if let Err(e) = window.close() {
            eprintln!("[Setup] Failed to close wizard window: {}", e);
        }
    }
    Ok(())
}

/// Wizard dismissed without choosing; the app has nothing to do.
#[tauri::command]
pub fn cancel_setup(app: AppHandle) {
    app.exit(0);
}
