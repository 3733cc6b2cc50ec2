//! Validator capabilities.
//!
//! A fixed contract for pluggable checks that run once, in registration
//! order, after self-healing. A capability that fails internally is captured
//! as a warning diagnostic and never aborts the pipeline.

use crate::diagnostics::{Diagnostic, DiagnosticsReport};
use crate::document::AgentDocument;
use serde_json::Value;
use std::sync::Arc;

/// Contract for a pluggable validator capability.
pub trait Validator: Send + Sync {
    fn name(&self) -> &str;

    /// Inspect the (possibly healed) document and append diagnostics.
    fn validate(
        &self,
        document: &AgentDocument,
        report: &mut DiagnosticsReport,
    ) -> anyhow::Result<()>;
}

/// Run capabilities in order, converting internal failures into warnings.
pub(crate) fn run_validators(
    validators: &[Arc<dyn Validator>],
    document: &AgentDocument,
    report: &mut DiagnosticsReport,
) {
    for validator in validators {
        if let Err(err) = validator.validate(document, report) {
            report.push(Diagnostic::warning(
                "VALIDATOR_FAILED",
                format!("Validator '{}' failed: {err}", validator.name()),
            ));
        }
    }
}

/// Verifies a declared `security.checksum` against the blake3 hash of the
/// canonical document (the normalized JSON form with the checksum removed).
pub struct ChecksumValidator;

impl Validator for ChecksumValidator {
    fn name(&self) -> &str {
        "checksum"
    }

    fn validate(
        &self,
        document: &AgentDocument,
        report: &mut DiagnosticsReport,
    ) -> anyhow::Result<()> {
        let Some(declared) = document.security.get("checksum").and_then(Value::as_str) else {
            return Ok(());
        };

        let mut expected = [0u8; 32];
        if hex::decode_to_slice(declared, &mut expected).is_err() {
            report.push(
                Diagnostic::warning(
                    "CHECKSUM_MALFORMED",
                    "Declared checksum is not a 64-character hex digest",
                )
                .with_suggestion("Declare security.checksum as a lowercase blake3 hex digest"),
            );
            return Ok(());
        }

        let canonical = canonical_bytes(document)?;
        let actual = blake3::hash(&canonical);
        // blake3's Hash comparison is constant-time.
        if actual != blake3::Hash::from(expected) {
            report.push(
                Diagnostic::error("CHECKSUM_MISMATCH", "Document content does not match its declared checksum")
                    .with_suggestion("Recompute security.checksum over the canonical document")
                    .with_context("declared", Value::String(declared.to_string()))
                    .with_context("actual", Value::String(actual.to_hex().to_string())),
            );
        }
        Ok(())
    }
}

/// Canonical serialization used for integrity checks: the document with the
/// checksum field stripped, serialized with sorted keys.
pub fn canonical_bytes(document: &AgentDocument) -> anyhow::Result<Vec<u8>> {
    let mut stripped = document.clone();
    stripped.security.remove("checksum");
    Ok(serde_json::to_vec(&stripped)?)
}

/// Warns when `meta.version` is not `MAJOR.MINOR.PATCH`-shaped.
pub struct SemverValidator;

impl Validator for SemverValidator {
    fn name(&self) -> &str {
        "semver"
    }

    fn validate(
        &self,
        document: &AgentDocument,
        report: &mut DiagnosticsReport,
    ) -> anyhow::Result<()> {
        let Some(version) = document.meta.as_ref().and_then(|m| m.version.as_deref()) else {
            return Ok(());
        };
        if !is_semver(version) {
            report.push(
                Diagnostic::warning(
                    "NON_SEMVER_VERSION",
                    format!("Version '{version}' is not MAJOR.MINOR.PATCH shaped"),
                )
                .with_suggestion("Use a semantic version such as 1.0.0"),
            );
        }
        Ok(())
    }
}

fn is_semver(version: &str) -> bool {
    let mut parts = 0;
    for part in version.split('.') {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        parts += 1;
    }
    parts == 3
}

/// Warns on legacy section spellings unless deprecated input is allowed.
pub struct DeprecatedFieldsValidator;

const DEPRECATED_SECTIONS: [(&str, &str); 2] = [("metadata", "meta"), ("capabilities", "skills")];

impl Validator for DeprecatedFieldsValidator {
    fn name(&self) -> &str {
        "deprecated-fields"
    }

    fn validate(
        &self,
        document: &AgentDocument,
        report: &mut DiagnosticsReport,
    ) -> anyhow::Result<()> {
        for (legacy, replacement) in DEPRECATED_SECTIONS {
            if document.extra.contains_key(legacy) {
                report.push(
                    Diagnostic::warning(
                        "DEPRECATED_FIELD",
                        format!("Section '{legacy}' is deprecated"),
                    )
                    .with_suggestion(format!("Use the '{replacement}' section instead")),
                );
            }
        }
        Ok(())
    }
}
