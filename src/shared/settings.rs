use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

use crate::shared::error::{AppError, AppResult};

fn default_hotkey() -> String {
    "ctrl+space".to_string()
}

fn default_primary_language() -> String {
    "tr".to_string()
}

fn default_window_width() -> u32 {
    600
}

fn default_window_height() -> u32 {
    60
}

/// Persisted user configuration.
///
/// Every field carries a serde default, so a settings file that only names
/// some keys is merged over the defaults rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub hotkey: String,
    pub primary_language: String,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            hotkey: default_hotkey(),
            primary_language: default_primary_language(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl AppSettings {
    pub fn get_settings_path() -> AppResult<PathBuf> {
        ProjectDirs::from("com", "quicktranslator", "quick-translator")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| AppError::System("Failed to determine config directory".to_string()))
    }

    /// Whether a settings file exists on disk. Used as the first-run gate.
    pub fn exists() -> bool {
        Self::get_settings_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Parse settings from JSON, normalizing degenerate values back to their
    /// defaults so a hand-edited file cannot leave the app without a hotkey
    /// or with a zero-sized window.
    pub fn from_json(content: &str) -> AppResult<Self> {
        let mut settings: Self = serde_json::from_str(content)?;
        let defaults = Self::default();
        if settings.hotkey.trim().is_empty() {
            settings.hotkey = defaults.hotkey;
        }
        if settings.primary_language.trim().is_empty() {
            settings.primary_language = defaults.primary_language;
        }
        if settings.window_width == 0 {
            settings.window_width = defaults.window_width;
        }
        if settings.window_height == 0 {
            settings.window_height = defaults.window_height;
        }
        Ok(settings)
    }

    /// Load settings from disk. Any failure (missing file, unreadable file,
    /// corrupt JSON) yields the defaults; the app must come up regardless.
    pub async fn load() -> Self {
        let path = match Self::get_settings_path() {
            Ok(path) => path,
            Err(e) => {
                eprintln!("[Settings] {}", e);
                return Self::default();
            }
        };

        match fs::read_to_string(&path).await {
            Ok(content) => Self::from_json(&content).unwrap_or_else(|e| {
                eprintln!("[Settings] Corrupt settings file, using defaults: {}", e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub async fn save(&self) -> AppResult<()> {
        let path = Self::get_settings_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content).await?;
        Ok(())
    }

    /// Hotkey formatted for the tray tooltip, e.g. "CTRL + SPACE".
    pub fn hotkey_display(&self) -> String {
        self.hotkey
            .split('+')
            .map(|part| part.trim().to_uppercase())
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_run_expectations() {
        let settings = AppSettings::default();
        assert_eq!(settings.hotkey, "ctrl+space");
        assert_eq!(settings.primary_language, "tr");
        assert_eq!(settings.window_width, 600);
        assert_eq!(settings.window_height, 60);
    }

    #[test]
    fn partial_file_merges_over_defaults() {
        let settings = AppSettings::from_json(r#"{"primary_language": "de"}"#).unwrap();
        assert_eq!(settings.primary_language, "de");
        assert_eq!(settings.hotkey, "ctrl+space");
        assert_eq!(settings.window_width, 600);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let settings =
            AppSettings::from_json(r#"{"hotkey": "alt+t", "theme": "dark"}"#).unwrap();
        assert_eq!(settings.hotkey, "alt+t");
    }

    #[test]
    fn corrupt_json_is_an_error() {
        assert!(AppSettings::from_json("{not json").is_err());
    }

    #[test]
    fn degenerate_values_are_normalized() {
        let settings = AppSettings::from_json(
            r#"{"hotkey": "  ", "primary_language": "", "window_width": 0, "window_height": 0}"#,
        )
        .unwrap();
        assert_eq!(settings.hotkey, "ctrl+space");
        assert_eq!(settings.primary_language, "tr");
        assert_eq!(settings.window_width, 600);
        assert_eq!(settings.window_height, 60);
    }

    #[test]
    fn hotkey_display_is_uppercased_and_spaced() {
        let mut settings = AppSettings::default();
        assert_eq!(settings.hotkey_display(), "CTRL + SPACE");
        settings.hotkey = "ctrl+shift+t".to_string();
        assert_eq!(settings.hotkey_display(), "CTRL + SHIFT + T");
    }
}
