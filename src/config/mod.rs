//! Configuration loading for Revcheck

mod schema;

pub use schema::{
    Config, ModelConfig, RuleToggle, ScoringOverrides, TranscriptionConfig, TranslationConfig,
};

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".revcheckrc.json";

/// Find and load config file with extends resolution. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)
    };

    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            load_config_with_extends(&path, &mut HashSet::new())
        }
        None => Ok(Config::default()),
    }
}

/// Load a config file and resolve extends chain
fn load_config_with_extends(config_path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Config> {
    // Prevent circular extends
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if !visited.insert(canonical) {
        anyhow::bail!(
            "Circular extends detected in config: {}",
            config_path.display()
        );
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;
    config.base_dir = config_path.parent().map(Path::to_path_buf);

    if let Some(extends) = config.extends.take() {
        let base_config = resolve_extends(config_path, &extends, visited)?;
        config.merge_from(base_config);
    }

    Ok(config)
}

/// Resolve an extends reference to a config
fn resolve_extends(
    config_path: &Path,
    extends: &str,
    visited: &mut HashSet<PathBuf>,
) -> Result<Config> {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));

    let extends_path = if Path::new(extends).is_absolute() {
        PathBuf::from(extends)
    } else {
        config_dir.join(extends)
    };

    // Ensure it has .json extension
    let extends_path = if extends_path.extension().is_none() {
        extends_path.with_extension("json")
    } else {
        extends_path
    };

    if !extends_path.exists() {
        anyhow::bail!(
            "Extended config not found: {} (referenced from {})",
            extends_path.display(),
            config_path.display()
        );
    }

    load_config_with_extends(&extends_path, visited)
}

/// Search for .revcheckrc.json in directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Default config written by `revcheck init`
pub fn default_config_json(threshold: u8) -> String {
    format!(
        r#"{{
  "threshold": {},
  "rules": {{
    "repetition": "on",
    "length": "on",
    "superlatives": "on",
    "shouting": "on",
    "positive-tone-low-rating": "on",
    "negative-tone-high-rating": "on"
  }},
  "scoring": {{
    "maxWordRepeats": 3,
    "minLength": 20,
    "maxLength": 300,
    "minSuperlatives": 2,
    "maxEmoji": 3,
    "lowRatingMax": 2,
    "highRatingMin": 4,
    "positivePolarity": 0.5,
    "negativePolarity": -0.3,
    "penaltyPerFlag": 20,
    "suspiciousFlags": 2,
    "fakeFlags": 3
  }},
  "model": {{
    "path": "revcheck-model.json",
    "vectorizer": "revcheck-vectorizer.json"
  }},
  "translation": {{
    "targetLang": "en"
  }}
}}
"#,
        threshold
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::ScoringPolicy;
    use crate::RuleId;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn no_config_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.threshold, None);
        assert_eq!(config.policy(), ScoringPolicy::default());
        assert!(config.disabled_rules().is_empty());
    }

    #[test]
    fn found_in_parent_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{ "threshold": 60 }"#).unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        let config = load_config(&nested, None).unwrap();
        assert_eq!(config.threshold, Some(60));
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = TempDir::new().unwrap();
        let err = load_config(dir.path(), Some(Path::new("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{ threshold: }").unwrap();
        let err = load_config(dir.path(), None).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }

    #[test]
    fn default_config_round_trips() {
        let config: Config = serde_json::from_str(&default_config_json(70)).unwrap();
        assert_eq!(config.threshold, Some(70));
        assert_eq!(config.policy(), ScoringPolicy::default());
        assert!(config.disabled_rules().is_empty());
        assert_eq!(config.target_lang(), "en");
    }

    #[test]
    fn rule_toggles() {
        let config: Config = serde_json::from_str(
            r#"{ "rules": { "negative-tone-high-rating": "off", "length": "off", "no-such-rule": "off", "repetition": "on" } }"#,
        )
        .unwrap();
        assert_eq!(
            config.disabled_rules(),
            vec![RuleId::Length, RuleId::NegativeToneHighRating]
        );
    }

    #[test]
    fn test_config_extends() {
        let dir = TempDir::new().unwrap();

        // Create base config
        let base_path = dir.path().join("base.json");
        let mut base_file = fs::File::create(&base_path).unwrap();
        writeln!(
            base_file,
            r#"{{
                "threshold": 70,
                "rules": {{ "shouting": "off" }},
                "scoring": {{ "maxLength": 500, "penaltyPerFlag": 25 }},
                "model": {{ "path": "models/m.json" }}
            }}"#
        )
        .unwrap();

        // Create child config that extends base
        let child_path = dir.path().join(CONFIG_FILENAME);
        let mut child_file = fs::File::create(&child_path).unwrap();
        writeln!(
            child_file,
            r#"{{
                "extends": "./base",
                "threshold": 80,
                "rules": {{ "length": "off" }},
                "scoring": {{ "penaltyPerFlag": 10 }}
            }}"#
        )
        .unwrap();

        let config = load_config(dir.path(), None).unwrap();

        // Child threshold overrides base
        assert_eq!(config.threshold, Some(80));
        // Rules from both files
        assert_eq!(
            config.disabled_rules(),
            vec![RuleId::Length, RuleId::Shouting]
        );
        // Child scoring wins, base fills the gaps
        let policy = config.policy();
        assert_eq!(policy.penalty_per_flag, 10);
        assert_eq!(policy.max_length, 500);
        assert_eq!(policy.min_length, 20);
        // Base artifact path stays relative to the base file
        let artifacts = config.model_artifacts(Path::new("/elsewhere"));
        assert_eq!(artifacts.model, dir.path().join("models/m.json"));
        assert_eq!(
            artifacts.vectorizer,
            dir.path().join(crate::classifier::DEFAULT_VECTORIZER_PATH)
        );
    }

    #[test]
    fn circular_extends_detected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), r#"{ "extends": "./b.json" }"#).unwrap();
        fs::write(dir.path().join("b.json"), r#"{ "extends": "./a.json" }"#).unwrap();
        let err = load_config(dir.path(), Some(Path::new("a.json"))).unwrap_err();
        assert!(err.to_string().contains("Circular extends"));
    }

    #[test]
    fn cli_threshold_wins() {
        let config: Config = serde_json::from_str(r#"{ "threshold": 70 }"#).unwrap();
        assert_eq!(config.merge_with_cli(Some(90)).threshold, Some(90));
        let config: Config = serde_json::from_str(r#"{ "threshold": 70 }"#).unwrap();
        assert_eq!(config.merge_with_cli(None).threshold, Some(70));
    }
}
