//! Parser configuration.
//!
//! A flat set of recognized options created once per parser instance and
//! never mutated. Besides in-code construction, configuration can be loaded
//! with the standard precedence: built-in defaults, then an optional TOML
//! file (explicit path or the XDG location), then `AIX_`-prefixed
//! environment variables.

use crate::plugin::Validator;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_MAX_DOCUMENT_SIZE: u64 = 50 * 1024 * 1024;
pub const DEFAULT_STREAMING_THRESHOLD: u64 = 10 * 1024 * 1024;
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

#[derive(Clone, Deserialize)]
pub struct ParserConfig {
    /// Escalate unresolved error diagnostics to a thrown aggregate failure.
    #[serde(default = "default_true")]
    pub strict_mode: bool,

    /// Verify a declared `security.checksum` against the document content.
    #[serde(default = "default_true")]
    pub validate_checksums: bool,

    /// Reserved; signature verification is not implemented.
    #[serde(default)]
    pub validate_signatures: bool,

    /// Allow the natural-language backend and its detection heuristics.
    #[serde(default)]
    pub enable_natural_language: bool,

    /// Synthesize missing required fields after validation fails.
    #[serde(default = "default_true")]
    pub enable_self_healing: bool,

    /// Fill defaults for missing fields before validation.
    #[serde(default = "default_true")]
    pub enable_smart_defaults: bool,

    /// Hard maximum source size in bytes; larger sources are rejected unread.
    #[serde(default = "default_max_document_size")]
    pub max_document_size: u64,

    /// Sources above this size are read through the streaming path.
    #[serde(default = "default_streaming_threshold")]
    pub streaming_threshold: u64,

    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    #[serde(default = "default_security_level")]
    pub security_level: String,

    /// Accept legacy section spellings without warnings.
    #[serde(default)]
    pub allow_deprecated: bool,

    /// Ordered validator capabilities, attached in code rather than files.
    #[serde(skip)]
    pub validators: Vec<Arc<dyn Validator>>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strict_mode: true,
            validate_checksums: true,
            validate_signatures: false,
            enable_natural_language: false,
            enable_self_healing: true,
            enable_smart_defaults: true,
            max_document_size: DEFAULT_MAX_DOCUMENT_SIZE,
            streaming_threshold: DEFAULT_STREAMING_THRESHOLD,
            cache_enabled: true,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            security_level: default_security_level(),
            allow_deprecated: false,
            validators: Vec::new(),
        }
    }
}

impl fmt::Debug for ParserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserConfig")
            .field("strict_mode", &self.strict_mode)
            .field("validate_checksums", &self.validate_checksums)
            .field("validate_signatures", &self.validate_signatures)
            .field("enable_natural_language", &self.enable_natural_language)
            .field("enable_self_healing", &self.enable_self_healing)
            .field("enable_smart_defaults", &self.enable_smart_defaults)
            .field("max_document_size", &self.max_document_size)
            .field("streaming_threshold", &self.streaming_threshold)
            .field("cache_enabled", &self.cache_enabled)
            .field("cache_capacity", &self.cache_capacity)
            .field("security_level", &self.security_level)
            .field("allow_deprecated", &self.allow_deprecated)
            .field("validators", &self.validators.len())
            .finish()
    }
}

impl ParserConfig {
    /// Load configuration with defaults → optional file → environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        match path {
            Some(path) => {
                builder = builder.add_source(File::with_name(&path.to_string_lossy()));
            }
            None => {
                if let Some(default_path) = Self::xdg_config_path() {
                    if default_path.exists() {
                        builder =
                            builder.add_source(File::with_name(&default_path.to_string_lossy()));
                    }
                }
            }
        }
        builder = builder.add_source(
            Environment::with_prefix("AIX")
                .separator("__")
                .try_parsing(true),
        );
        builder.build()?.try_deserialize()
    }

    /// Platform config location (`~/.config/aix/config.toml` on Linux).
    pub fn xdg_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "aix", "aix")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Append a validator capability, preserving registration order.
    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validators.push(validator);
        self
    }
}

fn default_true() -> bool {
    true
}

fn default_max_document_size() -> u64 {
    DEFAULT_MAX_DOCUMENT_SIZE
}

fn default_streaming_threshold() -> u64 {
    DEFAULT_STREAMING_THRESHOLD
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_security_level() -> String {
    "standard".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_surface() {
        let config = ParserConfig::default();
        assert!(config.strict_mode);
        assert!(config.enable_self_healing);
        assert!(config.enable_smart_defaults);
        assert!(!config.enable_natural_language);
        assert!(config.cache_enabled);
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(config.max_document_size, 50 * 1024 * 1024);
        assert_eq!(config.streaming_threshold, 10 * 1024 * 1024);
        assert_eq!(config.security_level, "standard");
        assert!(config.validators.is_empty());
    }

    #[test]
    fn partial_files_fall_back_to_defaults() {
        let config: ParserConfig = serde_json::from_str(r#"{"strict_mode": false}"#).unwrap();
        assert!(!config.strict_mode);
        assert!(config.enable_self_healing);
        assert_eq!(config.cache_capacity, 100);
    }
}
