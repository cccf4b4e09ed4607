//! Configuration for binding and inference
//!
//! Defaults match the engine: 1000x1000 blocks, comma-separated text, no
//! header line. A JSON file may override any subset of fields, and the
//! environment may override the block size and validation switch.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use mxmeta_core::format::constants::DEFAULT_BLOCK_SIZE;

/// Environment variable overriding [`MetaConfig::default_block_size`]
pub const ENV_BLOCK_SIZE: &str = "MXMETA_BLOCK_SIZE";

/// Environment variable overriding [`MetaConfig::validate_on_bind`]
pub const ENV_VALIDATE: &str = "MXMETA_VALIDATE";

/// Settings for text inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferConfig {
    /// Field delimiter for CSV input
    pub delimiter: char,
    /// Whether the first CSV line is a header
    pub header: bool,
    /// Lines per parallel work unit
    pub chunk_lines: usize,
}

impl InferConfig {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Set lines per work unit (clamped to at least 1)
    pub fn with_chunk_lines(mut self, chunk_lines: usize) -> Self {
        self.chunk_lines = chunk_lines.max(1);
        self
    }
}

impl Default for InferConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            header: false,
            chunk_lines: 64 * 1024,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaConfig {
    /// Block size assigned to inferred metadata and used when converting
    /// descriptions with no block size to engine characteristics
    pub default_block_size: i32,
    /// Reject bindings whose metadata fails validation
    pub validate_on_bind: bool,
    /// Inference settings
    pub infer: InferConfig,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            default_block_size: DEFAULT_BLOCK_SIZE,
            validate_on_bind: false,
            infer: InferConfig::default(),
        }
    }
}

impl MetaConfig {
    pub fn with_block_size(mut self, block_size: i32) -> Self {
        self.default_block_size = block_size;
        self
    }

    pub fn with_validation(mut self, validate_on_bind: bool) -> Self {
        self.validate_on_bind = validate_on_bind;
        self
    }

    pub fn with_infer(mut self, infer: InferConfig) -> Self {
        self.infer = infer;
        self
    }

    /// Load from a JSON file; missing fields keep their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        debug!(path = %path.display(), ?config, "loaded configuration");
        config.check()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_BLOCK_SIZE) {
            self.default_block_size = value.trim().parse().map_err(|_| Error::Config {
                key: ENV_BLOCK_SIZE,
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup(ENV_VALIDATE) {
            self.validate_on_bind = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(Error::Config {
                        key: ENV_VALIDATE,
                        value,
                    })
                }
            };
        }
        self.check()?;
        Ok(self)
    }

    fn check(&self) -> Result<()> {
        mxmeta_core::check_block_size(self.default_block_size)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mxmeta_core::MetaError;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = MetaConfig::default();
        assert_eq!(config.default_block_size, 1000);
        assert!(!config.validate_on_bind);
        assert_eq!(config.infer.delimiter, ',');
        assert!(!config.infer.header);
    }

    #[test]
    fn test_partial_json() {
        let config: MetaConfig =
            serde_json::from_str(r#"{"default_block_size": 256, "infer": {"header": true}}"#)
                .unwrap();
        assert_eq!(config.default_block_size, 256);
        assert!(config.infer.header);
        assert_eq!(config.infer.delimiter, ',');
        assert!(!config.validate_on_bind);
    }

    #[test]
    fn test_overrides() {
        let config = MetaConfig::default()
            .with_overrides_from(lookup(&[(ENV_BLOCK_SIZE, "512"), (ENV_VALIDATE, "Yes")]))
            .unwrap();
        assert_eq!(config.default_block_size, 512);
        assert!(config.validate_on_bind);

        let untouched = MetaConfig::default().with_overrides_from(lookup(&[])).unwrap();
        assert_eq!(untouched, MetaConfig::default());
    }

    #[test]
    fn test_bad_overrides() {
        let err = MetaConfig::default()
            .with_overrides_from(lookup(&[(ENV_BLOCK_SIZE, "big")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config { key: ENV_BLOCK_SIZE, .. }));

        let err = MetaConfig::default()
            .with_overrides_from(lookup(&[(ENV_VALIDATE, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config { key: ENV_VALIDATE, .. }));

        let err = MetaConfig::default()
            .with_overrides_from(lookup(&[(ENV_BLOCK_SIZE, "0")]))
            .unwrap_err();
        assert!(matches!(err, Error::Metadata(MetaError::NonPositiveBlockSize)));
    }

    #[test]
    fn test_chunk_lines_clamped() {
        assert_eq!(InferConfig::default().with_chunk_lines(0).chunk_lines, 1);
    }
}
