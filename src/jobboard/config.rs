use crate::documents::{UploadPolicy, DEFAULT_MAX_DOCUMENT_BYTES, MIME_DOCX, MIME_PDF};
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Label the job filter treats as "no category filter".
pub const ALL_CATEGORIES: &str = "All Categories";

/// Configuration for the board, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardConfig {
    /// Largest accepted document, in bytes
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: u64,

    /// MIME types accepted for CV uploads
    #[serde(default = "default_document_types")]
    pub accepted_document_types: Vec<String>,

    /// Categories offered when posting a job
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

fn default_max_document_bytes() -> u64 {
    DEFAULT_MAX_DOCUMENT_BYTES
}

fn default_document_types() -> Vec<String> {
    vec![MIME_PDF.to_string(), MIME_DOCX.to_string()]
}

fn default_categories() -> Vec<String> {
    [
        "Technology",
        "Design",
        "Marketing",
        "Finance",
        "Healthcare",
        "Education",
        "Engineering",
        "Customer Support",
        "Other",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: default_max_document_bytes(),
            accepted_document_types: default_document_types(),
            categories: default_categories(),
        }
    }
}

impl BoardConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(BoardError::Io)?;
        let config: BoardConfig =
            serde_json::from_str(&content).map_err(BoardError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(BoardError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(BoardError::Serialization)?;
        fs::write(config_path, content).map_err(BoardError::Io)?;
        Ok(())
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            accepted_types: self.accepted_document_types.clone(),
            max_bytes: self.max_document_bytes,
        }
    }

    /// Case-insensitive match against the configured categories, returning
    /// the canonical spelling.
    pub fn canonical_category(&self, input: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.eq_ignore_ascii_case(input.trim()))
            .map(String::as_str)
    }

    /// Key/value pairs for display, in a stable order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("max-document-bytes", self.max_document_bytes.to_string()),
            (
                "accepted-document-types",
                self.accepted_document_types.join(","),
            ),
            ("categories", self.categories.join(",")),
        ]
    }

    /// Set a value by its display key. Lists are comma separated.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "max-document-bytes" => {
                self.max_document_bytes = value.trim().parse().map_err(|_| {
                    BoardError::Validation(format!("Not a byte count: {}", value))
                })?;
            }
            "accepted-document-types" => self.accepted_document_types = split_list(value),
            "categories" => self.categories = split_list(value),
            other => {
                return Err(BoardError::Validation(format!(
                    "Unknown config key: {}",
                    other
                )))
            }
        }
        Ok(())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BoardConfig::default();
        assert_eq!(config.max_document_bytes, 5_242_880);
        assert_eq!(config.accepted_document_types.len(), 2);
        assert_eq!(config.categories.len(), 9);
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = BoardConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config, BoardConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("data");

        let mut config = BoardConfig::default();
        config.set("max-document-bytes", "1024").unwrap();
        config.set("categories", "Rust, Go ,").unwrap();
        config.save(&nested).unwrap();

        let loaded = BoardConfig::load(&nested).unwrap();
        assert_eq!(loaded.max_document_bytes, 1024);
        assert_eq!(loaded.categories, vec!["Rust", "Go"]);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILENAME),
            r#"{"max_document_bytes": 10}"#,
        )
        .unwrap();

        let config = BoardConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config.max_document_bytes, 10);
        assert_eq!(config.categories, default_categories());
    }

    #[test]
    fn test_unknown_key_and_bad_number() {
        let mut config = BoardConfig::default();
        assert!(config.set("colour", "blue").is_err());
        assert!(config.set("max-document-bytes", "lots").is_err());
        assert_eq!(config, BoardConfig::default());
    }

    #[test]
    fn test_canonical_category() {
        let config = BoardConfig::default();
        assert_eq!(config.canonical_category("customer support"), Some("Customer Support"));
        assert_eq!(config.canonical_category("Astrology"), None);
    }
}
