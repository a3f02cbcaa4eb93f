mod api;
mod config;
mod core;
mod session;
mod shared;
mod system;

use std::sync::Arc;

use tauri::{
    menu::{Menu, MenuItem, PredefinedMenuItem},
    tray::TrayIconBuilder,
    AppHandle, Manager, WebviewUrl, WebviewWindowBuilder,
};
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};

use api::commands;
use session::{PopupSession, POPUP_LABEL};
use shared::error::{AppError, AppResult};
use shared::settings::AppSettings;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .plugin(tauri_plugin_clipboard_manager::init())
        .setup(|app| {
            if AppSettings::exists() {
                let settings = tauri::async_runtime::block_on(AppSettings::load());
                bootstrap_main(app.handle(), settings)?;
            } else {
                // First run: the wizard calls complete_setup, which persists
                // the choices and starts the main session.
                open_setup_window(app.handle())?;
            }
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::translator::text_changed,
            commands::translator::translate_now,
            commands::translator::language_display_name,
            commands::translator::copy_translation,
            commands::window::hide_popup,
            commands::window::resize_for_result,
            commands::settings::get_settings,
            commands::settings::setup_options,
            commands::settings::complete_setup,
            commands::settings::cancel_setup,
        ])
        .run(tauri::generate_context!())
        .unwrap_or_else(|e| {
            eprintln!("FATAL: Failed to start application: {}", e);
            std::process::exit(1);
        });
}

/// Start the main session: tray icon, hidden popup window, global hotkey.
/// Called from setup on normal runs, or from the wizard on first run.
pub(crate) fn bootstrap_main(app: &AppHandle, settings: AppSettings) -> AppResult<()> {
    let window = WebviewWindowBuilder::new(app, POPUP_LABEL, WebviewUrl::App("index.html".into()))
        .title("Quick Translator")
        .inner_size(settings.window_width as f64, settings.window_height as f64)
        .resizable(false)
        .decorations(false)
        .transparent(true)
        .always_on_top(true)
        .skip_taskbar(true)
        .visible(false)
        .center()
        .build()
        .map_err(|e| AppError::System(format!("Failed to create popup window: {}", e)))?;

    // Cosmetic, applied while the window is still hidden.
    system::window::effects::apply_background_blur(&window);
    system::window::effects::apply_rounded_corners(&window);

    let session = PopupSession::new(app.clone(), settings.clone())?;
    app.manage(Arc::clone(&session));

    {
        let session = Arc::clone(&session);
        window.on_window_event(move |event| match event {
            tauri::WindowEvent::Focused(false) => session.focus_lost(),
            tauri::WindowEvent::CloseRequested { api, .. } => {
                // The popup hides instead of closing; the app lives in the tray.
                api.prevent_close();
                session.escape();
            }
            _ => {}
        });
    }

    build_tray(app, &settings)?;
    register_hotkey(app, &settings, session)?;

    println!("[App] Ready, hotkey: {}", settings.hotkey_display());
    Ok(())
}

fn build_tray(app: &AppHandle, settings: &AppSettings) -> AppResult<()> {
    let toggle_label = format!("Show Translator ({})", settings.hotkey_display());
    let toggle_item = MenuItem::with_id(app, "toggle", &toggle_label, true, None::<&str>)
        .map_err(|e| AppError::System(e.to_string()))?;
    let separator =
        PredefinedMenuItem::separator(app).map_err(|e| AppError::System(e.to_string()))?;
    let quit_item = MenuItem::with_id(app, "quit", "Quit", true, None::<&str>)
        .map_err(|e| AppError::System(e.to_string()))?;

    let menu = Menu::with_items(app, &[&toggle_item, &separator, &quit_item])
        .map_err(|e| AppError::System(e.to_string()))?;

    let icon = app
        .default_window_icon()
        .ok_or_else(|| AppError::System("Failed to get default window icon".to_string()))?
        .clone();

    TrayIconBuilder::new()
        .icon(icon)
        .tooltip(format!("Quick Translator ({})", settings.hotkey_display()))
        .menu(&menu)
        .on_menu_event(|app, event| match event.id().as_ref() {
            "toggle" => {
                if let Some(session) = app.try_state::<Arc<PopupSession>>() {
                    session.inner().toggle();
                }
            }
            "quit" => {
                if let Err(e) = app.global_shortcut().unregister_all() {
                    eprintln!("[App] Failed to unregister shortcuts on quit: {}", e);
                }
                app.exit(0);
            }
            _ => {}
        })
        .build(app)
        .map_err(|e| AppError::System(format!("Failed to build tray icon: {}", e)))?;

    Ok(())
}

fn register_hotkey(
    app: &AppHandle,
    settings: &AppSettings,
    session: Arc<PopupSession>,
) -> AppResult<()> {
    let shortcut = settings
        .hotkey
        .parse::<Shortcut>()
        .map_err(|e| AppError::Validation(format!("Bad hotkey '{}': {}", settings.hotkey, e)))?;

    // Clean slate; failure here just means it was not registered yet.
    let _ = app.global_shortcut().unregister(shortcut);

    app.global_shortcut()
        .on_shortcut(shortcut, move |_app, _shortcut, event| {
            if event.state() == ShortcutState::Pressed {
                session.toggle();
            }
        })
        .map_err(|e| {
            AppError::System(format!(
                "Failed to register hotkey '{}': {}",
                settings.hotkey, e
            ))
        })?;

    Ok(())
}

fn open_setup_window(app: &AppHandle) -> AppResult<()> {
    WebviewWindowBuilder::new(app, "setup", WebviewUrl::App("index.html?view=setup".into()))
        .title("Quick Translator Setup")
        .inner_size(420.0, 360.0)
        .resizable(false)
        .center()
        .build()
        .map_err(|e| AppError::System(format!("Failed to create setup window: {}", e)))?;
    Ok(())
}
