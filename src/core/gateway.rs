//! Translation gateway
//!
//! Wraps the remote detect+translate capability and normalizes every outcome
//! into a uniform [`TranslationResult`]. Uses the unofficial Google Translate
//! endpoint (free tier); single attempt, fail fast, no cache, no retry.

use async_trait::async_trait;
use serde::Serialize;

use crate::core::direction;
use crate::shared::error::{AppError, AppResult};

/// Uniform outcome of a translation attempt.
///
/// On failure all language fields are empty and `error` carries a
/// human-readable message; the caller displays it in place of the translation.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationResult {
    pub translated: String,
    pub detected_lang: String,
    pub source_lang: String,
    pub target_lang: String,
    pub success: bool,
    pub error: Option<String>,
}

impl TranslationResult {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            translated: String::new(),
            detected_lang: String::new(),
            source_lang: String::new(),
            target_lang: String::new(),
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Seam over the remote translation service so the coordinator and gateway
/// can be exercised without network access.
#[async_trait]
pub trait TranslateBackend: Send + Sync {
    /// Detect the language of `text`. `None` means the service answered but
    /// produced no detection.
    async fn detect(&self, text: &str) -> AppResult<Option<String>>;

    /// Translate `text` with an explicit source and target language.
    async fn translate(&self, text: &str, source: &str, target: &str) -> AppResult<String>;
}

/// Backend talking to the unofficial Google Translate endpoint.
pub struct GoogleBackend {
    http: reqwest::Client,
}

impl GoogleBackend {
    pub fn new() -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent("quick-translator/0.1")
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;
        Ok(Self { http })
    }

    async fn fetch(&self, source: &str, target: &str, text: &str) -> AppResult<serde_json::Value> {
        let url = format!(
            "https://translate.googleapis.com/translate_a/single?client=gtx&sl={}&tl={}&dt=t&q={}",
            source,
            target,
            urlencoding::encode(text)
        );

        let res = self
            .http
            .get(&url)
            .header("User-Agent", "Mozilla/5.0")
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        if !res.status().is_success() {
            return Err(AppError::Network(format!(
                "Translation API error: {}",
                res.status()
            )));
        }

        res.json::<serde_json::Value>()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to parse JSON: {}", e)))
    }
}

#[async_trait]
impl TranslateBackend for GoogleBackend {
    async fn detect(&self, text: &str) -> AppResult<Option<String>> {
        // The gtx response carries the detected source language at index 2.
        let json = self.fetch("auto", direction::FALLBACK_TARGET, text).await?;
        Ok(json
            .get(2)
            .and_then(|v| v.as_str())
            .map(|s| s.to_lowercase()))
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> AppResult<String> {
        let json = self.fetch(source, target, text).await?;

        // Response shape: [[["Translated segment", "original", ...], ...], ...]
        let sentences = json
            .get(0)
            .and_then(|v| v.as_array())
            .ok_or_else(|| AppError::Validation("Invalid response format from Google".to_string()))?;

        let mut translated = String::new();
        for sentence in sentences {
            if let Some(segment) = sentence.get(0).and_then(|v| v.as_str()) {
                translated.push_str(segment);
            }
        }
        Ok(translated)
    }
}

/// Detect-then-translate with automatic direction selection.
pub struct TranslationGateway<B: TranslateBackend> {
    backend: B,
    primary_lang: String,
}

impl<B: TranslateBackend> TranslationGateway<B> {
    pub fn new(backend: B, primary_lang: impl Into<String>) -> Self {
        Self {
            backend,
            primary_lang: primary_lang.into(),
        }
    }

    pub fn primary_lang(&self) -> &str {
        &self.primary_lang
    }

    /// Translate `text`, picking the target from the detected language.
    ///
    /// Empty or whitespace-only input short-circuits to a failure result
    /// without touching the network. A failed or missing detection degrades
    /// to "en" instead of aborting; a failed translate call produces an
    /// error-shaped result.
    pub async fn translate(&self, text: &str) -> TranslationResult {
        if text.trim().is_empty() {
            return TranslationResult::failure("Empty text");
        }

        let detected = match self.backend.detect(text).await {
            Ok(Some(code)) if !code.is_empty() => code,
            Ok(_) => direction::FALLBACK_TARGET.to_string(),
            Err(e) => {
                eprintln!("[Gateway] Detection failed, assuming \"en\": {}", e);
                direction::FALLBACK_TARGET.to_string()
            }
        };

        let target = direction::resolve_target(&detected, &self.primary_lang).to_string();

        match self.backend.translate(text, &detected, &target).await {
            Ok(translated) => TranslationResult {
                translated,
                detected_lang: detected.clone(),
                source_lang: detected,
                target_lang: target,
                success: true,
                error: None,
            },
            Err(e) => TranslationResult::failure(e.to_string()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scriptable backend used by gateway and coordinator tests.
    pub(crate) struct MockBackend {
        pub detect_response: Option<String>,
        pub detect_fails: bool,
        pub translate_fails: bool,
        pub translate_calls: AtomicUsize,
        pub last_translate: Mutex<Option<(String, String, String)>>,
    }

    impl MockBackend {
        pub fn detecting(code: &str) -> Self {
            Self {
                detect_response: Some(code.to_string()),
                detect_fails: false,
                translate_fails: false,
                translate_calls: AtomicUsize::new(0),
                last_translate: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl TranslateBackend for MockBackend {
        async fn detect(&self, _text: &str) -> AppResult<Option<String>> {
            if self.detect_fails {
                return Err(AppError::Network("detect unavailable".to_string()));
            }
            Ok(self.detect_response.clone())
        }

        async fn translate(&self, text: &str, source: &str, target: &str) -> AppResult<String> {
            self.translate_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_translate.lock().unwrap() =
                Some((text.to_string(), source.to_string(), target.to_string()));
            if self.translate_fails {
                return Err(AppError::Network("service unavailable".to_string()));
            }
            Ok(format!("{}:{}", target, text))
        }
    }

    #[tokio::test]
    async fn empty_input_never_reaches_the_backend() {
        let gateway = TranslationGateway::new(MockBackend::detecting("en"), "tr");

        for input in ["", "   ", "\t\n"] {
            let result = gateway.translate(input).await;
            assert!(!result.success);
            assert_eq!(result.error.as_deref(), Some("Empty text"));
            assert!(result.detected_lang.is_empty());
            assert!(result.source_lang.is_empty());
            assert!(result.target_lang.is_empty());
        }
        assert_eq!(gateway.backend.translate_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn foreign_text_is_translated_to_primary() {
        let gateway = TranslationGateway::new(MockBackend::detecting("en"), "tr");

        let result = gateway.translate("hello").await;
        assert!(result.success);
        assert_eq!(result.translated, "tr:hello");
        assert_eq!(result.detected_lang, "en");
        assert_eq!(result.source_lang, "en");
        assert_eq!(result.target_lang, "tr");
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn primary_text_is_translated_to_english() {
        let gateway = TranslationGateway::new(MockBackend::detecting("tr"), "tr");

        let result = gateway.translate("merhaba").await;
        assert!(result.success);
        assert_eq!(result.target_lang, "en");
    }

    #[tokio::test]
    async fn missing_detection_defaults_to_english() {
        let mut backend = MockBackend::detecting("en");
        backend.detect_response = None;
        let gateway = TranslationGateway::new(backend, "tr");

        let result = gateway.translate("hello").await;
        assert!(result.success);
        assert_eq!(result.detected_lang, "en");
        assert_eq!(result.target_lang, "tr");
    }

    #[tokio::test]
    async fn failed_detection_degrades_instead_of_aborting() {
        let mut backend = MockBackend::detecting("en");
        backend.detect_fails = true;
        let gateway = TranslationGateway::new(backend, "tr");

        let result = gateway.translate("hello").await;
        assert!(result.success);
        assert_eq!(result.detected_lang, "en");
    }

    #[tokio::test]
    async fn translate_failure_yields_error_result_with_empty_fields() {
        let mut backend = MockBackend::detecting("en");
        backend.translate_fails = true;
        let gateway = TranslationGateway::new(backend, "tr");

        let result = gateway.translate("hello").await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("service unavailable"));
        assert!(result.translated.is_empty());
        assert!(result.detected_lang.is_empty());
        assert!(result.target_lang.is_empty());
    }
}
