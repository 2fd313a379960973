//! Linear bag-of-words classifier.
//!
//! Two JSON artifacts: a vectorizer (token -> feature index) and a linear
//! model (`classes`, `coef`, `intercept`) in the layout scikit-learn's
//! `CountVectorizer` and linear classifiers export. Binary models have a
//! single coefficient row; the positive side of the decision function picks
//! `classes[1]`.

use super::{ArtifactError, Classifier};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Token pattern: words of two or more word characters
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

fn default_true() -> bool {
    true
}

/// Vocabulary mapping tokens to feature indices
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vectorizer {
    pub vocabulary: HashMap<String, usize>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    /// Use presence (1.0) instead of counts
    #[serde(default)]
    pub binary: bool,
}

impl Vectorizer {
    pub fn n_features(&self) -> usize {
        self.vocabulary.values().max().map_or(0, |max| max + 1)
    }
}

/// Linear model weights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub classes: Vec<String>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl LinearModel {
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.classes.len() < 2 {
            return Err(format!("need at least 2 classes, got {}", self.classes.len()));
        }
        let rows = if self.classes.len() == 2 { 1 } else { self.classes.len() };
        if self.coef.len() != rows {
            return Err(format!("expected {} coefficient rows, got {}", rows, self.coef.len()));
        }
        if self.intercept.len() != rows {
            return Err(format!("expected {} intercepts, got {}", rows, self.intercept.len()));
        }
        if let Some(row) = self.coef.iter().find(|row| row.len() < n_features) {
            return Err(format!(
                "coefficient row has {} weights but the vocabulary needs {}",
                row.len(),
                n_features
            ));
        }
        Ok(())
    }
}

/// Vectorizer + linear model
pub struct LinearClassifier {
    vectorizer: Vectorizer,
    model: LinearModel,
    token_re: Regex,
    fingerprint: String,
}

impl LinearClassifier {
    /// Build from in-memory parts; fails when the shapes don't line up
    pub fn new(vectorizer: Vectorizer, model: LinearModel) -> Result<Self, String> {
        model.validate(vectorizer.n_features())?;
        let token_re = Regex::new(TOKEN_PATTERN).map_err(|e| e.to_string())?;
        Ok(Self {
            vectorizer,
            model,
            token_re,
            fingerprint: String::new(),
        })
    }

    /// Load from artifact files. Both files must exist.
    pub fn load(model_path: &Path, vectorizer_path: &Path) -> Result<Self, ArtifactError> {
        for path in [model_path, vectorizer_path] {
            if !path.is_file() {
                return Err(ArtifactError::Missing(path.to_path_buf()));
            }
        }

        let model_bytes = read_artifact(model_path)?;
        let vectorizer_bytes = read_artifact(vectorizer_path)?;

        let model: LinearModel =
            serde_json::from_slice(&model_bytes).map_err(|e| ArtifactError::Invalid {
                path: model_path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let vectorizer: Vectorizer =
            serde_json::from_slice(&vectorizer_bytes).map_err(|e| ArtifactError::Invalid {
                path: vectorizer_path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let mut classifier =
            Self::new(vectorizer, model).map_err(|reason| ArtifactError::Invalid {
                path: model_path.to_path_buf(),
                reason,
            })?;
        classifier.fingerprint = fingerprint(&model_bytes);
        Ok(classifier)
    }

    /// SHA-256 of the model artifact (empty for in-memory models)
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn classes(&self) -> &[String] {
        &self.model.classes
    }

    /// Sparse feature vector: index -> count (or 1.0 when binary)
    fn features(&self, text: &str) -> HashMap<usize, f64> {
        let text = if self.vectorizer.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let mut features = HashMap::new();
        for m in self.token_re.find_iter(&text) {
            if let Some(&idx) = self.vectorizer.vocabulary.get(m.as_str()) {
                let value = features.entry(idx).or_insert(0.0);
                *value = if self.vectorizer.binary { 1.0 } else { *value + 1.0 };
            }
        }
        features
    }

    /// Decision function value per coefficient row
    pub fn decision(&self, text: &str) -> Vec<f64> {
        let features = self.features(text);
        self.model
            .coef
            .iter()
            .zip(&self.model.intercept)
            .map(|(row, intercept)| {
                intercept
                    + features
                        .iter()
                        .map(|(idx, value)| row[*idx] * value)
                        .sum::<f64>()
            })
            .collect()
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, text: &str) -> String {
        let scores = self.decision(text);
        let idx = if scores.len() == 1 {
            usize::from(scores[0] > 0.0)
        } else {
            scores
                .iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |best, (i, &s)| {
                    if s > best.1 {
                        (i, s)
                    } else {
                        best
                    }
                })
                .0
        };
        self.model.classes[idx].clone()
    }

    fn fingerprint(&self) -> Option<&str> {
        (!self.fingerprint.is_empty()).then_some(self.fingerprint.as_str())
    }
}

fn read_artifact(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    fs::read(path).map_err(|source| ArtifactError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vocab(words: &[&str]) -> Vectorizer {
        Vectorizer {
            vocabulary: words
                .iter()
                .enumerate()
                .map(|(i, w)| (w.to_string(), i))
                .collect(),
            lowercase: true,
            binary: false,
        }
    }

    fn binary_model() -> LinearClassifier {
        LinearClassifier::new(
            vocab(&["amazing", "buy", "sturdy", "cable"]),
            LinearModel {
                classes: vec!["genuine".into(), "fake".into()],
                coef: vec![vec![1.5, 1.0, -1.0, -0.5]],
                intercept: vec![-1.0],
            },
        )
        .unwrap()
    }

    #[test]
    fn binary_uses_sign_of_decision() {
        let clf = binary_model();
        assert_eq!(clf.predict("AMAZING amazing, buy now"), "fake");
        assert_eq!(clf.predict("Sturdy cable, does the job"), "genuine");
        // no known tokens: intercept only
        assert_eq!(clf.predict(""), "genuine");
    }

    #[test]
    fn counts_repeated_tokens() {
        let clf = binary_model();
        assert_eq!(clf.decision("buy buy"), vec![1.0]);
    }

    #[test]
    fn single_character_tokens_are_ignored() {
        let mut v = vocab(&["a", "buy"]);
        v.binary = true;
        let clf = LinearClassifier::new(
            v,
            LinearModel {
                classes: vec!["genuine".into(), "fake".into()],
                coef: vec![vec![10.0, 1.0]],
                intercept: vec![0.0],
            },
        )
        .unwrap();
        assert_eq!(clf.decision("a a buy buy"), vec![1.0]);
    }

    #[test]
    fn multiclass_uses_argmax() {
        let clf = LinearClassifier::new(
            vocab(&["great", "bad", "meh"]),
            LinearModel {
                classes: vec!["positive".into(), "negative".into(), "neutral".into()],
                coef: vec![
                    vec![1.0, -1.0, 0.0],
                    vec![-1.0, 1.0, 0.0],
                    vec![0.0, 0.0, 1.0],
                ],
                intercept: vec![0.0, 0.0, 0.1],
            },
        )
        .unwrap();
        assert_eq!(clf.predict("great"), "positive");
        assert_eq!(clf.predict("bad bad"), "negative");
        assert_eq!(clf.predict("meh"), "neutral");
    }

    #[test]
    fn rejects_mismatched_shapes() {
        let err = LinearClassifier::new(
            vocab(&["one", "two", "three"]),
            LinearModel {
                classes: vec!["genuine".into(), "fake".into()],
                coef: vec![vec![1.0]],
                intercept: vec![0.0],
            },
        )
        .err()
        .unwrap();
        assert!(err.contains("vocabulary needs 3"));

        let err = LinearClassifier::new(
            vocab(&["one"]),
            LinearModel {
                classes: vec!["only".into()],
                coef: vec![vec![1.0]],
                intercept: vec![0.0],
            },
        )
        .err()
        .unwrap();
        assert!(err.contains("at least 2 classes"));
    }

    #[test]
    fn load_from_files_sets_fingerprint() {
        let dir = TempDir::new().unwrap();
        let model_path = dir.path().join("model.json");
        let vec_path = dir.path().join("vectorizer.json");
        fs::write(
            &model_path,
            r#"{"classes":["genuine","fake"],"coef":[[2.0]],"intercept":[-1.0]}"#,
        )
        .unwrap();
        fs::write(&vec_path, r#"{"vocabulary":{"wow":0}}"#).unwrap();

        let clf = LinearClassifier::load(&model_path, &vec_path).unwrap();
        assert_eq!(clf.fingerprint().len(), 64);
        assert_eq!(clf.predict("wow"), "fake");
        assert_eq!(clf.predict("fine"), "genuine");
    }

    #[test]
    fn load_reports_invalid_json() {
        let dir = TempDir::new().unwrap();
        let model_path = dir.path().join("model.json");
        let vec_path = dir.path().join("vectorizer.json");
        fs::write(&model_path, "not json").unwrap();
        fs::write(&vec_path, r#"{"vocabulary":{}}"#).unwrap();

        let err = LinearClassifier::load(&model_path, &vec_path).err().unwrap();
        assert!(matches!(err, ArtifactError::Invalid { .. }));
    }

    #[test]
    fn load_requires_both_files() {
        let dir = TempDir::new().unwrap();
        let model_path = dir.path().join("model.json");
        fs::write(
            &model_path,
            r#"{"classes":["genuine","fake"],"coef":[[]],"intercept":[0.0]}"#,
        )
        .unwrap();
        let vec_path = dir.path().join("missing.json");
        match LinearClassifier::load(&model_path, &vec_path) {
            Err(ArtifactError::Missing(p)) => assert_eq!(p, vec_path),
            other => panic!("expected Missing, got {:?}", other.err()),
        }
    }
}
