//! Language direction resolver
//!
//! Decides which language a detected input should be translated into,
//! given the user's configured primary language.

/// Fixed fallback target used when the input is already in the primary language.
pub const FALLBACK_TARGET: &str = "en";

/// Resolve the target language for a translation.
///
/// If the detected language equals the primary language the text is translated
/// to English, otherwise to the primary language. Any string is accepted as a
/// code; validity is the gateway's concern.
///
/// Note: when the primary language is itself "en" and English input is
/// detected, this still returns "en" (an English→English translate call).
/// That mirrors the long-standing behavior of the app and is kept on purpose.
pub fn resolve_target<'a>(detected: &str, primary: &'a str) -> &'a str {
    if detected == primary {
        FALLBACK_TARGET
    } else {
        primary
    }
}
