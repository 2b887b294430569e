//! Configuration for the validation harness
//!
//! Loaded once from a JSON file (`optcheck.json` by default); every
//! field has a sensible default so a missing file means default
//! behavior, not an error.

use crate::error::{OptcheckError, OptcheckResult};
use crate::validate::VALIDATION_FLAKINESS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "optcheck.json";

/// External validator command configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Program invoked per validation; receives the fixed `args`, then
    /// the benchmark URI, then the applied action tokens
    pub command: String,
    /// Fixed leading arguments
    pub args: Vec<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            command: "optcheck-backend".to_string(),
            args: Vec::new(),
        }
    }
}

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Repeated validation attempts per entry
    pub attempts: u32,
    /// External validator command
    pub backend: BackendConfig,
    /// Benchmark URIs the corpus accepts; empty means any
    pub benchmarks: Vec<String>,
    /// Action tokens the catalog accepts; empty means any
    pub actions: Vec<String>,
    /// Extra expected-pass registry files checked alongside the
    /// built-in set
    pub expected_pass: Vec<PathBuf>,
    /// Extra expected-fail registry files
    pub expected_fail: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            attempts: VALIDATION_FLAKINESS,
            backend: BackendConfig::default(),
            benchmarks: Vec::new(),
            actions: Vec::new(),
            expected_pass: Vec::new(),
            expected_fail: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> OptcheckResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            OptcheckError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            OptcheckError::config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Load configuration, falling back to defaults when the file does
    /// not exist
    pub fn load_or_default(path: &Path) -> OptcheckResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> OptcheckResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| {
            OptcheckError::config(format!("failed to write {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.attempts, VALIDATION_FLAKINESS);
        assert!(config.benchmarks.is_empty());
        assert_eq!(config.backend.command, "optcheck-backend");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load_or_default(Path::new("/nonexistent/optcheck.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);

        let mut config = Config::default();
        config.attempts = 3;
        config.backend.command = "sh".to_string();
        config.backend.args = vec!["-c".to_string(), "validate.sh".to_string()];
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults_for_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, r#"{"attempts": 2}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.attempts, 2);
        assert_eq!(config.backend, BackendConfig::default());
    }

    #[test]
    fn test_malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, OptcheckError::Config(_)));
    }
}
