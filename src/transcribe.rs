//! Speech-to-text for spoken reviews
//!
//! Audio is handed to a [`Transcriber`]; the resulting text goes through the
//! same scorer as typed reviews. The HTTP transcriber requires the `remote`
//! feature.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Accepted audio containers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
    Webm,
}

impl AudioFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, TranscriptionError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| TranscriptionError::UnsupportedFormat(path.display().to_string()))?;
        ext.parse()
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Webm => "audio/webm",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Webm => "webm",
        }
    }
}

impl FromStr for AudioFormat {
    type Err = TranscriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "mp3" | "mpeg" => Ok(AudioFormat::Mp3),
            "wav" | "wave" => Ok(AudioFormat::Wav),
            "webm" => Ok(AudioFormat::Webm),
            other => Err(TranscriptionError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Audio could not be turned into text
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("unsupported audio format: {0} (expected mp3, wav or webm)")]
    UnsupportedFormat(String),
    #[error("audio is empty")]
    EmptyAudio,
    #[error("transcription service not configured (set REVCHECK_TRANSCRIBE_URL or transcription.url)")]
    NotConfigured,
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("transcription API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("no speech recognized")]
    NoSpeech,
}

/// Turns audio bytes into text
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, audio: &[u8], format: AudioFormat) -> Result<String, TranscriptionError>;
}

/// Transcribe and normalise the result: empty input and empty transcripts are errors
pub fn transcribe_review(
    transcriber: &dyn Transcriber,
    audio: &[u8],
    format: AudioFormat,
) -> Result<String, TranscriptionError> {
    if audio.is_empty() {
        return Err(TranscriptionError::EmptyAudio);
    }
    let text = transcriber.transcribe(audio, format)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(TranscriptionError::NoSpeech);
    }
    tracing::debug!(%format, bytes = audio.len(), chars = text.chars().count(), "audio transcribed");
    Ok(text.to_string())
}

/// Client for a Whisper-style HTTP endpoint: raw audio in, `{"text": ...}` out
#[allow(dead_code)]
pub struct HttpTranscriber {
    url: String,
    api_key: Option<String>,
    language: Option<String>,
    timeout: Duration,
}

impl HttpTranscriber {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            language: None,
            timeout: Duration::from_secs(120),
        }
    }

    /// Read `REVCHECK_TRANSCRIBE_URL` and optional `REVCHECK_TRANSCRIBE_KEY`
    pub fn from_env() -> Result<Self, TranscriptionError> {
        let url = std::env::var("REVCHECK_TRANSCRIBE_URL")
            .map_err(|_| TranscriptionError::NotConfigured)?;
        let mut transcriber = Self::new(url);
        transcriber.api_key = std::env::var("REVCHECK_TRANSCRIBE_KEY").ok();
        Ok(transcriber)
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Spoken language hint (e.g. "en")
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Transcriber for HttpTranscriber {
    #[cfg(feature = "remote")]
    fn transcribe(&self, audio: &[u8], format: AudioFormat) -> Result<String, TranscriptionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| TranscriptionError::RequestFailed(e.to_string()))?;

        let mut request = client
            .post(&self.url)
            .header("Content-Type", format.mime_type())
            .body(audio.to_vec());
        if let Some(ref language) = self.language {
            request = request.query(&[("language", language.as_str())]);
        }
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .map_err(|e| TranscriptionError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(TranscriptionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let json: serde_json::Value = response
            .json()
            .map_err(|e| TranscriptionError::InvalidResponse(e.to_string()))?;
        json["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| TranscriptionError::InvalidResponse("no text in response".into()))
    }

    #[cfg(not(feature = "remote"))]
    fn transcribe(&self, _audio: &[u8], _format: AudioFormat) -> Result<String, TranscriptionError> {
        Err(TranscriptionError::RequestFailed(
            "remote feature not enabled. Rebuild with: cargo build --features remote".to_string(),
        ))
    }
}
