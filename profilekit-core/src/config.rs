//! Runtime configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default maximum number of values per `IN (...)` search query.
pub const DEFAULT_SEARCH_CHUNK_SIZE: usize = 500;

/// Default maximum property value length, in characters.
pub const DEFAULT_MAX_VALUE_LENGTH: usize = 2048;

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid JSON for [`ProfileConfig`].
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for validation and search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// ISO 3166-1 region for phone numbers entered without an international
    /// prefix. When unset, such numbers are rejected.
    pub default_phone_region: Option<String>,
    /// Maximum number of candidate values per search query.
    pub search_chunk_size: usize,
    /// Maximum length of a property value, in characters.
    pub max_value_length: usize,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            default_phone_region: None,
            search_chunk_size: DEFAULT_SEARCH_CHUNK_SIZE,
            max_value_length: DEFAULT_MAX_VALUE_LENGTH,
        }
    }
}

impl ProfileConfig {
    /// Loads the configuration from a JSON file. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Configured default phone region, ignoring blank values.
    #[must_use]
    pub fn phone_region(&self) -> Option<&str> {
        self.default_phone_region
            .as_deref()
            .map(str::trim)
            .filter(|region| !region.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_json_takes_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_phone_region": "DE"}}"#).unwrap();
        let config = ProfileConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.phone_region(), Some("DE"));
        assert_eq!(config.search_chunk_size, DEFAULT_SEARCH_CHUNK_SIZE);
        assert_eq!(config.max_value_length, DEFAULT_MAX_VALUE_LENGTH);
    }

    #[test]
    fn test_blank_region_is_unset() {
        let config = ProfileConfig {
            default_phone_region: Some("  ".to_string()),
            ..ProfileConfig::default()
        };
        assert_eq!(config.phone_region(), None);
    }

    #[test]
    fn test_invalid_json_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            ProfileConfig::from_json_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}
