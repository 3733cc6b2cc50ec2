//! Structural validation rules.
//!
//! These are the only structural rules; everything further is left to the
//! registered validator capabilities. The function is pure and never mutates
//! the document — errors are collected, not thrown, and only become a failure
//! at the strict-mode gate.

use crate::diagnostics::Diagnostic;
use crate::document::AgentDocument;

pub fn validate_structure(doc: &AgentDocument) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    match &doc.meta {
        None => diagnostics.push(
            Diagnostic::error("MISSING_META", "Missing required meta section")
                .with_suggestion("Add a meta section with name and version fields"),
        ),
        Some(meta) => {
            if meta.name.is_none() {
                diagnostics.push(
                    Diagnostic::error("MISSING_NAME", "Missing required meta.name field")
                        .with_suggestion("Add a name field to the meta section"),
                );
            }
            if meta.version.is_none() {
                diagnostics.push(
                    Diagnostic::error("MISSING_VERSION", "Missing required meta.version field")
                        .with_suggestion("Add a version field to the meta section"),
                );
            }
        }
    }

    if doc.persona.is_none() {
        diagnostics.push(Diagnostic::warning("MISSING_PERSONA", "Missing persona section"));
    }

    if doc.skills.is_none() {
        diagnostics.push(Diagnostic::warning(
            "MISSING_SKILLS",
            "Missing or invalid skills section",
        ));
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::document::Meta;

    #[test]
    fn empty_document_reports_one_error_and_two_warnings() {
        let diagnostics = validate_structure(&AgentDocument::default());
        let codes: Vec<_> = diagnostics.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, ["MISSING_META", "MISSING_PERSONA", "MISSING_SKILLS"]);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[1].severity, Severity::Warning);
    }

    #[test]
    fn partial_meta_reports_per_field_errors() {
        let doc = AgentDocument {
            meta: Some(Meta {
                name: Some("Atlas".into()),
                version: None,
                id: None,
            }),
            ..AgentDocument::default()
        };
        let diagnostics = validate_structure(&doc);
        assert!(diagnostics.iter().any(|d| d.code == "MISSING_VERSION"));
        assert!(!diagnostics.iter().any(|d| d.code == "MISSING_NAME"));
        assert!(!diagnostics.iter().any(|d| d.code == "MISSING_META"));
    }

    #[test]
    fn complete_document_is_clean() {
        let doc = crate::defaults::apply_defaults(AgentDocument::default());
        assert!(validate_structure(&doc).is_empty());
    }
}
