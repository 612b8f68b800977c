//! Retriever configuration.
//!
//! Loaded from TOML; every field has a default so an empty document is a
//! valid configuration.

use coursekg_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Topic keywords recognised in questions and course text by default.
pub const DEFAULT_TOPIC_KEYWORDS: [&str; 4] = [
    "machine learning",
    "deep learning",
    "neural networks",
    "computer vision",
];

/// Configuration for retrieval, formatting, and topic extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// Expansion rounds used by `retrieve_context`.
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,

    /// Maximum edges per path for `find_paths_between`.
    #[serde(default = "default_max_path_length")]
    pub max_path_length: usize,

    /// Entries rendered per edge type (and per path listing).
    #[serde(default = "default_max_edges_per_type")]
    pub max_edges_per_type: usize,

    /// Topic keywords matched against questions and course text.
    #[serde(default = "default_topic_keywords")]
    pub topic_keywords: Vec<String>,
}

fn default_max_hops() -> usize {
    2
}

fn default_max_path_length() -> usize {
    3
}

fn default_max_edges_per_type() -> usize {
    10
}

fn default_topic_keywords() -> Vec<String> {
    DEFAULT_TOPIC_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            max_hops: default_max_hops(),
            max_path_length: default_max_path_length(),
            max_edges_per_type: default_max_edges_per_type(),
            topic_keywords: default_topic_keywords(),
        }
    }
}

impl RetrieverConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse retriever config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))?;
        log::info!("Loaded retriever config from {}", path.display());
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_edges_per_type == 0 {
            return Err(Error::config("max_edges_per_type must be greater than 0"));
        }
        if self.topic_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(Error::config("topic_keywords must not contain blank entries"));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = RetrieverConfig::default();
        assert_eq!(config.max_hops, 2);
        assert_eq!(config.max_path_length, 3);
        assert_eq!(config.max_edges_per_type, 10);
        assert_eq!(config.topic_keywords.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_empty_document_uses_defaults() {
        let config = RetrieverConfig::from_toml_str("").unwrap();
        assert_eq!(config, RetrieverConfig::default());
    }

    #[test]
    fn test_config_partial_override() {
        let config = RetrieverConfig::from_toml_str(
            "max_hops = 1\ntopic_keywords = [\"algorithms\"]\n",
        )
        .unwrap();
        assert_eq!(config.max_hops, 1);
        assert_eq!(config.max_path_length, 3);
        assert_eq!(config.topic_keywords, vec!["algorithms"]);
    }

    #[test]
    fn test_config_rejects_zero_edge_limit() {
        let err = RetrieverConfig::from_toml_str("max_edges_per_type = 0").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_rejects_bad_toml() {
        let err = RetrieverConfig::from_toml_str("max_hops = \"two\"").unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_config_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_path_length = 5").unwrap();
        let config = RetrieverConfig::load(file.path()).unwrap();
        assert_eq!(config.max_path_length, 5);
    }

    #[test]
    fn test_config_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RetrieverConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = RetrieverConfig {
            max_hops: 4,
            ..RetrieverConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(RetrieverConfig::from_toml_str(&text).unwrap(), config);
    }
}
