//! Parse diagnostics: severities, individual records, and the per-call report.
//!
//! A [`DiagnosticsReport`] is created at the start of each parse operation and
//! threaded through every pipeline stage. It is never stored on the parser
//! instance, so concurrent parse operations cannot interleave their records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Severity of a single diagnostic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Fatal unless healed; aborts the parse in strict mode.
    Error,
    /// Never fatal.
    Warning,
    /// Pipeline progress facts (detected format, streaming mode, cache hits).
    Info,
    /// Audit record of a field synthesized by the self-healing engine.
    Fix,
}

/// One reported fact about a parse operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable machine-readable code, e.g. `MISSING_META`.
    pub code: String,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_fix: Option<bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, Value>,
    pub timestamp: DateTime<Utc>,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity,
            suggestion: None,
            auto_fix: None,
            context: BTreeMap::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    pub fn info(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    pub fn fix(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Fix, code, message).with_auto_fix()
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_auto_fix(mut self) -> Self {
        self.auto_fix = Some(true);
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }
}

/// Append-only diagnostics collected during one parse operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    records: Vec<Diagnostic>,
}

impl DiagnosticsReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.records.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.records.extend(diagnostics);
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter().filter(move |d| d.severity == severity)
    }

    pub fn error_count(&self) -> usize {
        self.with_severity(Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.with_severity(Severity::Warning).count()
    }

    pub fn fix_count(&self) -> usize {
        self.with_severity(Severity::Fix).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Whether any record carries the given code.
    pub fn contains_code(&self, code: &str) -> bool {
        self.records.iter().any(|d| d.code == code)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
