use std::path::Path;

use formwork_document::input::InputConfig;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Engine configuration.
///
/// ```json
/// { "trim-text": true, "input": { "repeated-keys": "array" } }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Strip surrounding whitespace (including full-width spaces) from text
    /// before parsing.
    pub trim_text: bool,
    /// How form multi-maps are translated.
    pub input: InputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trim_text: true,
            input: InputConfig::default(),
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use formwork_document::input::RepeatedKeys;

    use super::*;

    #[test]
    fn test_defaults_apply_to_missing_keys() {
        assert_eq!(Config::from_json_str("{}").unwrap(), Config::default());
        assert!(Config::default().trim_text);
    }

    #[test]
    fn test_kebab_case_keys() {
        let config =
            Config::from_json_str(r#"{"trim-text": false, "input": {"repeated-keys": "last"}}"#)
                .unwrap();
        assert!(!config.trim_text);
        assert_eq!(config.input.repeated_keys, RepeatedKeys::Last);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Config::from_json_str("{"),
            Err(ConfigError::Parse(_))
        ));
    }
}
