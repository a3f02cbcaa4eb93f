use serde::Serialize;

use crate::core::coordinator::Delivery;
use crate::shared::settings::AppSettings;

/// Events pushed from the backend to the webview.
#[derive(Debug, Clone, Serialize)]
pub enum AppEvent {
    /// A translation result for the latest settled input.
    TranslationReady(Delivery),
    /// The input settled on empty text; clear any displayed result.
    TranslationCleared,
    /// The popup was re-shown; the frontend resets input and result.
    SessionReset,
    SettingsUpdated(AppSettings),
}
