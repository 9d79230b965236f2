//! Drill configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::loader::DEFAULT_DATA_FILE;
use crate::model::NO_DEFINITION;

/// File name searched for in the current directory.
pub const CONFIG_FILE: &str = "unitdrill.toml";

/// Environment variable overriding [`DrillConfig::data`].
pub const DATA_ENV_VAR: &str = "UNITDRILL_DATA";

/// Top-level unitdrill configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillConfig {
    /// Path to the vocabulary JSON file.
    #[serde(default = "default_data")]
    pub data: PathBuf,
    /// Show the remaining-card count while drilling.
    #[serde(default = "default_true")]
    pub show_remaining: bool,
    /// Text shown for words without a definition.
    #[serde(default = "default_placeholder")]
    pub definition_placeholder: String,
}

fn default_data() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}
fn default_true() -> bool {
    true
}
fn default_placeholder() -> String {
    NO_DEFINITION.to_string()
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            data: default_data(),
            show_remaining: true,
            definition_placeholder: default_placeholder(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    // Expanded values are copied verbatim, never rescanned.
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without an explicit path:
/// 1. `unitdrill.toml` in the current directory
/// 2. `~/.config/unitdrill/config.toml`
///
/// `UNITDRILL_DATA` overrides the data path found in either file.
pub fn load_config_from(path: Option<&Path>) -> Result<DrillConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from(CONFIG_FILE);
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => DrillConfig::default(),
    };

    if let Ok(data) = std::env::var(DATA_ENV_VAR) {
        config.data = PathBuf::from(data);
    }

    Ok(config)
}

/// Parse a TOML string into a [`DrillConfig`], expanding `${VAR}` in `data`.
pub fn parse_config_str(content: &str) -> Result<DrillConfig> {
    let mut config: DrillConfig = toml::from_str(content)?;
    config.data = PathBuf::from(resolve_env_vars(&config.data.to_string_lossy()));
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("unitdrill"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_UNITDRILL_TEST_VAR", "decks");
        assert_eq!(resolve_env_vars("${_UNITDRILL_TEST_VAR}"), "decks");
        assert_eq!(
            resolve_env_vars("${_UNITDRILL_TEST_VAR}/words.json"),
            "decks/words.json"
        );
        assert_eq!(resolve_env_vars("unterminated ${oops"), "unterminated ${oops");
        std::env::remove_var("_UNITDRILL_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_rescan_values() {
        std::env::set_var("_UNITDRILL_SELF_REF", "${_UNITDRILL_SELF_REF}");
        assert_eq!(
            resolve_env_vars("a/${_UNITDRILL_SELF_REF}/b"),
            "a/${_UNITDRILL_SELF_REF}/b"
        );
        std::env::remove_var("_UNITDRILL_SELF_REF");
        assert_eq!(resolve_env_vars("${_UNITDRILL_UNSET_VAR}x"), "x");
    }

    #[test]
    fn default_config() {
        let config = DrillConfig::default();
        assert_eq!(config.data, PathBuf::from("words.json"));
        assert!(config.show_remaining);
        assert_eq!(config.definition_placeholder, NO_DEFINITION);
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config_str("show_remaining = false\n").unwrap();
        assert!(!config.show_remaining);
        assert_eq!(config.data, PathBuf::from("words.json"));
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
data = "vocab/unit-words.json"
show_remaining = true
definition_placeholder = "?"
"#;
        let config = parse_config_str(toml_str).unwrap();
        assert_eq!(config.data, PathBuf::from("vocab/unit-words.json"));
        assert_eq!(config.definition_placeholder, "?");
    }

    #[test]
    fn explicit_missing_path_is_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/unitdrill.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "definition_placeholder = \"n/a\"\n").unwrap();
        let config = load_config_from(Some(path.as_path())).unwrap();
        assert_eq!(config.definition_placeholder, "n/a");
    }
}
