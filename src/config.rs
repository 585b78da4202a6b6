//! Engine configuration flags consulted during resolution and evaluation.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Flags threaded through validation and evaluation contexts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Match property names case-sensitively
    pub case_sensitive: bool,
    /// Reject properties that are not valid for the member's level instead
    /// of returning NULL
    pub strict_properties: bool,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_strict_properties(mut self, strict: bool) -> Self {
        self.strict_properties = strict;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid engine configuration")
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_permissive() {
        let config = EngineConfig::new();
        assert!(!config.case_sensitive);
        assert!(!config.strict_properties);
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = EngineConfig::from_json(r#"{"strict_properties": true}"#).unwrap();
        assert_eq!(config, EngineConfig::new().with_strict_properties(true));
        assert!(EngineConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"case_sensitive": true, "strict_properties": true}}"#).unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert!(config.case_sensitive);
        assert!(config.strict_properties);
        assert!(EngineConfig::load(Path::new("/nonexistent/cubecalc.json")).is_err());
    }
}
