//! Config schema and deserialization

use crate::classifier::{ModelArtifacts, DEFAULT_MODEL_PATH, DEFAULT_VECTORIZER_PATH};
use crate::scorer::ScoringPolicy;
use crate::translate::DEFAULT_TARGET_LANG;
use crate::RuleId;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Rule switch (on, off)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleToggle {
    On,
    /// Disable the rule entirely
    Off,
}

/// Scoring thresholds; unset fields fall back to the base config, then the defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringOverrides {
    pub max_word_repeats: Option<usize>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min_superlatives: Option<usize>,
    pub max_emoji: Option<usize>,
    pub low_rating_max: Option<u8>,
    pub high_rating_min: Option<u8>,
    pub positive_polarity: Option<f64>,
    pub negative_polarity: Option<f64>,
    pub penalty_per_flag: Option<u32>,
    pub suspicious_flags: Option<usize>,
    pub fake_flags: Option<usize>,
}

macro_rules! merge_fields {
    ($this:expr, $base:expr, $($field:ident),+ $(,)?) => {
        $( if $this.$field.is_none() { $this.$field = $base.$field; } )+
    };
}

macro_rules! apply_fields {
    ($overrides:expr, $policy:expr, $($field:ident),+ $(,)?) => {
        $( if let Some(value) = $overrides.$field { $policy.$field = value; } )+
    };
}

impl ScoringOverrides {
    fn merge_from(&mut self, base: ScoringOverrides) {
        merge_fields!(
            self,
            base,
            max_word_repeats,
            min_length,
            max_length,
            min_superlatives,
            max_emoji,
            low_rating_max,
            high_rating_min,
            positive_polarity,
            negative_polarity,
            penalty_per_flag,
            suspicious_flags,
            fake_flags,
        );
    }

    /// Apply on top of the default policy
    pub fn to_policy(&self) -> ScoringPolicy {
        let mut policy = ScoringPolicy::default();
        apply_fields!(
            self,
            policy,
            max_word_repeats,
            min_length,
            max_length,
            min_superlatives,
            max_emoji,
            low_rating_max,
            high_rating_min,
            positive_polarity,
            negative_polarity,
            penalty_per_flag,
            suspicious_flags,
            fake_flags,
        );
        policy
    }
}

/// ML model artifact locations (relative paths resolve against the config file)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub vectorizer: Option<PathBuf>,
}

/// Translation service settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub target_lang: Option<String>,
}

/// Transcription service settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionConfig {
    #[serde(default)]
    pub url: Option<String>,
    /// Spoken language hint
    #[serde(default)]
    pub language: Option<String>,
}

/// Root config structure for .revcheckrc.json
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default)]
    pub extends: Option<String>,

    /// Minimum genuineness score for `check` (exit 1 if below)
    #[serde(default)]
    pub threshold: Option<u8>,

    /// Per-rule switches. Key is the rule id in kebab-case.
    #[serde(default)]
    pub rules: HashMap<String, RuleToggle>,

    /// Scoring thresholds
    #[serde(default)]
    pub scoring: ScoringOverrides,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub translation: TranslationConfig,

    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Directory of the config file this was loaded from
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_threshold: Option<u8>) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        self
    }

    /// Scoring policy with config overrides applied
    pub fn policy(&self) -> ScoringPolicy {
        self.scoring.to_policy()
    }

    /// Rules switched off in config. Unknown rule names are logged and skipped.
    pub fn disabled_rules(&self) -> Vec<RuleId> {
        let mut disabled = Vec::new();
        for (name, toggle) in &self.rules {
            match name.parse::<RuleId>() {
                Ok(rule) if *toggle == RuleToggle::Off => disabled.push(rule),
                Ok(_) => {}
                Err(e) => tracing::warn!("{} in config, ignoring", e),
            }
        }
        disabled.sort_by_key(|r| RuleId::ALL.iter().position(|x| x == r));
        disabled
    }

    /// Model artifact paths, resolved against the config directory (or `cwd`)
    pub fn model_artifacts(&self, cwd: &Path) -> ModelArtifacts {
        let base = self.base_dir.as_deref().unwrap_or(cwd);
        let resolve = |p: &Option<PathBuf>, default: &str| -> PathBuf {
            match p {
                Some(p) if p.is_absolute() => p.clone(),
                Some(p) => base.join(p),
                None => base.join(default),
            }
        };
        ModelArtifacts::new(
            resolve(&self.model.path, DEFAULT_MODEL_PATH),
            resolve(&self.model.vectorizer, DEFAULT_VECTORIZER_PATH),
        )
    }

    /// Target language for translation
    pub fn target_lang(&self) -> &str {
        self.translation
            .target_lang
            .as_deref()
            .unwrap_or(DEFAULT_TARGET_LANG)
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }

        // Merge rules (this config takes precedence)
        for (rule, toggle) in base.rules {
            self.rules.entry(rule).or_insert(toggle);
        }

        self.scoring.merge_from(base.scoring);

        // Artifact paths from the base stay relative to the base file
        if self.model.path.is_none() {
            self.model.path = rebase(base.model.path, base.base_dir.as_deref());
        }
        if self.model.vectorizer.is_none() {
            self.model.vectorizer = rebase(base.model.vectorizer, base.base_dir.as_deref());
        }

        if self.translation.url.is_none() {
            self.translation.url = base.translation.url;
        }
        if self.translation.target_lang.is_none() {
            self.translation.target_lang = base.translation.target_lang;
        }
        if self.transcription.url.is_none() {
            self.transcription.url = base.transcription.url;
        }
        if self.transcription.language.is_none() {
            self.transcription.language = base.transcription.language;
        }
    }
}

fn rebase(path: Option<PathBuf>, dir: Option<&Path>) -> Option<PathBuf> {
    match (path, dir) {
        (Some(p), Some(dir)) if p.is_relative() => Some(dir.join(p)),
        (p, _) => p,
    }
}
