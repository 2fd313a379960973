//! Optional ML classifier backed by trained model artifacts
//!
//! The heuristic scorer never depends on this module. When the artifacts are
//! missing the ML flow reports "model not available" and everything else
//! keeps working.

pub mod linear;

pub use linear::{LinearClassifier, LinearModel, Vectorizer};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_MODEL_PATH: &str = "revcheck-model.json";
pub const DEFAULT_VECTORIZER_PATH: &str = "revcheck-vectorizer.json";

/// Predicts a label for a review text
pub trait Classifier: Send + Sync {
    fn predict(&self, text: &str) -> String;

    /// Identifies the loaded model in reports, if known
    fn fingerprint(&self) -> Option<&str> {
        None
    }
}

/// Errors loading model artifacts
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("model artifact not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to read model artifact {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid model artifact {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl ArtifactError {
    /// Missing artifacts are a normal condition, not a failure
    pub fn is_missing(&self) -> bool {
        matches!(self, ArtifactError::Missing(_))
    }
}

/// Locations of the model and vectorizer artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelArtifacts {
    pub model: PathBuf,
    pub vectorizer: PathBuf,
}

impl ModelArtifacts {
    pub fn new(model: impl Into<PathBuf>, vectorizer: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            vectorizer: vectorizer.into(),
        }
    }

    /// Default artifact names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(DEFAULT_MODEL_PATH), dir.join(DEFAULT_VECTORIZER_PATH))
    }

    /// Load both artifacts into a shareable classifier
    pub fn load(&self) -> Result<Arc<dyn Classifier>, ArtifactError> {
        let classifier = LinearClassifier::load(&self.model, &self.vectorizer)?;
        tracing::info!(
            model = %self.model.display(),
            fingerprint = classifier.fingerprint(),
            classes = ?classifier.classes(),
            "loaded ML model"
        );
        Ok(Arc::new(classifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_artifacts_are_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        let artifacts = ModelArtifacts::in_dir(dir.path());
        let err = artifacts.load().err().unwrap();
        assert!(err.is_missing());
        assert!(err.to_string().contains(DEFAULT_MODEL_PATH));
    }

    #[test]
    fn test_double_implements_trait() {
        struct AlwaysFake;
        impl Classifier for AlwaysFake {
            fn predict(&self, _text: &str) -> String {
                "fake".to_string()
            }
        }
        let shared: Arc<dyn Classifier> = Arc::new(AlwaysFake);
        assert_eq!(shared.predict("anything"), "fake");
        assert_eq!(shared.fingerprint(), None);
    }

    #[test]
    fn loaded_model_exposes_fingerprint() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_MODEL_PATH),
            r#"{"classes":["genuine","fake"],"coef":[[1.0]],"intercept":[0.0]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_VECTORIZER_PATH),
            r#"{"vocabulary":{"wow":0}}"#,
        )
        .unwrap();

        let classifier = ModelArtifacts::in_dir(dir.path()).load().unwrap();
        let fingerprint = classifier.fingerprint().unwrap();
        assert_eq!(fingerprint.len(), 64);
        assert!(fingerprint.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
