//! Fatal parse failures and their structured, serializable report form.
//!
//! Source and format errors abort the pipeline immediately. Structural errors
//! are collected as diagnostics instead and only surface here, as
//! [`AixError::ValidationFailed`], when strict mode finds unresolved errors at
//! the end of the pipeline.

use crate::diagnostics::{DiagnosticsReport, Severity};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AixError {
    #[error("Source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Source size {} exceeds maximum {}", format_bytes(*size), format_bytes(*max))]
    SourceTooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("Failed to read source {}: {source}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported or undetectable document format")]
    UnsupportedFormat,

    #[error("Natural language parsing is disabled")]
    NaturalLanguageDisabled,

    #[error("Invalid JSON: {message}")]
    JsonSyntax { message: String },

    #[error("Invalid YAML at line {line}: {message}")]
    YamlSyntax { message: String, line: usize },

    #[error("Invalid TOML at line {line}: {message}")]
    TomlSyntax { message: String, line: usize },

    #[error("Streaming read cancelled")]
    Cancelled,

    #[error("Validation failed with {} error(s)", report.error_count())]
    ValidationFailed { report: DiagnosticsReport },
}

impl AixError {
    /// Stable machine-readable code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SourceNotFound { .. } => "SOURCE_NOT_FOUND",
            Self::SourceTooLarge { .. } => "SOURCE_TOO_LARGE",
            Self::SourceRead { .. } => "SOURCE_READ_ERROR",
            Self::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            Self::NaturalLanguageDisabled => "NATURAL_LANGUAGE_DISABLED",
            Self::JsonSyntax { .. } => "JSON_PARSE_ERROR",
            Self::YamlSyntax { .. } => "YAML_PARSE_ERROR",
            Self::TomlSyntax { .. } => "TOML_PARSE_ERROR",
            Self::Cancelled => "PARSE_CANCELLED",
            Self::ValidationFailed { .. } => "VALIDATION_FAILED",
        }
    }

    /// Remediation hint suitable for direct display.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::SourceNotFound { .. } => Some("Check the file path and try again"),
            Self::SourceTooLarge { .. } => {
                Some("Increase max_document_size in the parser config or reduce the document size")
            }
            Self::SourceRead { .. } => None,
            Self::UnsupportedFormat => Some(
                "Provide JSON, YAML-like, or TOML-like content, or enable natural language parsing",
            ),
            Self::NaturalLanguageDisabled => {
                Some("Enable with enable_natural_language = true in the parser config")
            }
            Self::JsonSyntax { .. } => Some("Check JSON syntax and try again"),
            Self::YamlSyntax { .. } => Some("Check YAML syntax and indentation"),
            Self::TomlSyntax { .. } => Some("Check TOML syntax and try again"),
            Self::Cancelled => None,
            Self::ValidationFailed { .. } => {
                Some("Inspect the attached diagnostics for the individual failures")
            }
        }
    }

    /// Serializable form carrying code, message, severity, suggestion, and
    /// context, suitable for logs or UI display.
    pub fn report(&self) -> ErrorReport {
        let mut context = BTreeMap::new();
        match self {
            Self::SourceNotFound { path } | Self::SourceRead { path, .. } => {
                context.insert("path".into(), Value::String(path.display().to_string()));
            }
            Self::SourceTooLarge { path, size, max } => {
                context.insert("path".into(), Value::String(path.display().to_string()));
                context.insert("size".into(), Value::from(*size));
                context.insert("max".into(), Value::from(*max));
            }
            Self::YamlSyntax { line, .. } | Self::TomlSyntax { line, .. } => {
                context.insert("line".into(), Value::from(*line));
            }
            Self::ValidationFailed { report } => {
                context.insert(
                    "diagnostics".into(),
                    serde_json::to_value(report).unwrap_or_default(),
                );
            }
            _ => {}
        }

        ErrorReport {
            code: self.code().to_string(),
            message: self.to_string(),
            severity: Severity::Error,
            suggestion: self.suggestion().map(str::to_string),
            context,
            timestamp: Utc::now(),
        }
    }
}

/// Structured, serializable view of a thrown [`AixError`].
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub code: String,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, Value>,
    pub timestamp: DateTime<Utc>,
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} {}", UNITS[0])
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}
