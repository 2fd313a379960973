//! Translation of reviews before scoring
//!
//! Translation never blocks scoring: [`translate_review`] falls back to the
//! original text whenever the translator fails.
//!
//! The HTTP translator requires the `remote` feature:
//! ```toml
//! revcheck = { version = "0.3", features = ["remote"] }
//! ```

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_TARGET_LANG: &str = "en";

/// Error from a translator. Callers normally never see these.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation service not configured (set REVCHECK_TRANSLATE_URL or translation.url)")]
    NotConfigured,
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("translation API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Translates text into a target language
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslationError>;
}

/// Translate a review, returning the original text unchanged on any failure
pub fn translate_review(translator: &dyn Translator, text: &str, target_lang: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }
    match translator.translate(text, target_lang) {
        Ok(translated) => {
            tracing::debug!(target_lang, "review translated");
            translated
        }
        Err(e) => {
            tracing::warn!(error = %e, target_lang, "translation failed, using original text");
            text.to_string()
        }
    }
}

/// Client for a LibreTranslate-compatible HTTP API
#[allow(dead_code)]
pub struct HttpTranslator {
    url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpTranslator {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Read `REVCHECK_TRANSLATE_URL` and optional `REVCHECK_TRANSLATE_KEY`
    pub fn from_env() -> Result<Self, TranslationError> {
        let url =
            std::env::var("REVCHECK_TRANSLATE_URL").map_err(|_| TranslationError::NotConfigured)?;
        let mut translator = Self::new(url);
        translator.api_key = std::env::var("REVCHECK_TRANSLATE_KEY").ok();
        Ok(translator)
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Translator for HttpTranslator {
    #[cfg(feature = "remote")]
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslationError> {
        use serde_json::json;

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| TranslationError::RequestFailed(e.to_string()))?;

        let mut body = json!({
            "q": text,
            "source": "auto",
            "target": target_lang,
            "format": "text",
        });
        if let Some(ref key) = self.api_key {
            body["api_key"] = json!(key);
        }

        let response = client
            .post(&self.url)
            .json(&body)
            .send()
            .map_err(|e| TranslationError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(TranslationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let json: serde_json::Value = response
            .json()
            .map_err(|e| TranslationError::InvalidResponse(e.to_string()))?;
        json["translatedText"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| TranslationError::InvalidResponse("no translatedText in response".into()))
    }

    #[cfg(not(feature = "remote"))]
    fn translate(&self, _text: &str, _target_lang: &str) -> Result<String, TranslationError> {
        Err(TranslationError::RequestFailed(
            "remote feature not enabled. Rebuild with: cargo build --features remote".to_string(),
        ))
    }
}
