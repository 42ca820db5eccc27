//! Configuration structures for the demand estimator.

use crate::error::{Error, Result};
use crate::types::{ParseConfig, DEFAULT_CANDIDATES};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ingestion configuration.
    pub ingestion: IngestionConfig,
}

impl Config {
    /// Load a configuration from a JSON file. Missing sections keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.ingestion.candidates.is_empty() {
            return Err(Error::config("ingestion.candidates must not be empty"));
        }
        Ok(())
    }
}

/// Ingestion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Configurations to probe, in priority order. The first that succeeds wins.
    pub candidates: Vec<ParseConfig>,
    /// Skip whitespace following a delimiter.
    pub leading_whitespace: bool,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_CANDIDATES.to_vec(),
            leading_whitespace: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DecimalSeparator, Delimiter, TextEncoding};
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ingestion.candidates.len(), 6);
        assert_eq!(config.ingestion.candidates[0].delimiter, Delimiter::Comma);
        assert_eq!(config.ingestion.candidates[0].encoding, TextEncoding::Latin1);
        assert!(config.ingestion.leading_whitespace);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json_str(r#"{"ingestion": {"leading_whitespace": false}}"#).unwrap();
        assert!(!config.ingestion.leading_whitespace);
        assert_eq!(config.ingestion.candidates, DEFAULT_CANDIDATES.to_vec());

        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config.ingestion.candidates.len(), 6);
    }

    #[test]
    fn test_custom_candidates() {
        let json = r#"{"ingestion": {"candidates": [
            {"delimiter": ";", "decimal": ",", "encoding": "utf-8"}
        ]}}"#;
        let config = Config::from_json_str(json).unwrap();
        assert_eq!(
            config.ingestion.candidates,
            vec![ParseConfig::new(Delimiter::Semicolon, DecimalSeparator::Comma, TextEncoding::Utf8)]
        );
    }

    #[test]
    fn test_empty_candidates_rejected() {
        let err = Config::from_json_str(r#"{"ingestion": {"candidates": []}}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"ingestion": {{"leading_whitespace": false}}}}"#).unwrap();
        let config = Config::from_json_file(file.path()).unwrap();
        assert!(!config.ingestion.leading_whitespace);
    }
}
