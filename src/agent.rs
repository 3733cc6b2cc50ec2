//! The parsed agent wrapper returned to callers.

use crate::diagnostics::{Diagnostic, DiagnosticsReport};
use crate::document::{AgentDocument, Meta, Persona, Skill, Tools};
use crate::format::DocumentFormat;
use crate::validate::validate_structure;
use serde::Serialize;
use serde_json::{Map, Value};

/// Immutable result of a successful parse: the normalized document bound to
/// the diagnostics, detected format, and source label it was produced with.
///
/// Created once at the end of the pipeline and never mutated; ownership is
/// shared between the caller and the content cache via `Arc`.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedAgent {
    document: AgentDocument,
    diagnostics: DiagnosticsReport,
    format: DocumentFormat,
    source: String,
}

impl ParsedAgent {
    pub(crate) fn new(
        document: AgentDocument,
        diagnostics: DiagnosticsReport,
        format: DocumentFormat,
        source: String,
    ) -> Self {
        Self {
            document,
            diagnostics,
            format,
            source,
        }
    }

    pub fn document(&self) -> &AgentDocument {
        &self.document
    }

    pub fn meta(&self) -> Option<&Meta> {
        self.document.meta.as_ref()
    }

    pub fn persona(&self) -> Option<&Persona> {
        self.document.persona.as_ref()
    }

    pub fn skills(&self) -> &[Skill] {
        self.document.skills.as_deref().unwrap_or_default()
    }

    pub fn tools(&self) -> Option<&Tools> {
        self.document.tools.as_ref()
    }

    pub fn memory(&self) -> &Map<String, Value> {
        &self.document.memory
    }

    pub fn security(&self) -> &Map<String, Value> {
        &self.document.security
    }

    pub fn diagnostics(&self) -> &DiagnosticsReport {
        &self.diagnostics
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Re-run the structural rules against the held document, independently
    /// of the diagnostics recorded at parse time.
    pub fn revalidate(&self) -> Vec<Diagnostic> {
        validate_structure(&self.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::apply_defaults;

    #[test]
    fn accessors_expose_the_normalized_sections() {
        let document = apply_defaults(AgentDocument::default());
        let agent = ParsedAgent::new(
            document,
            DiagnosticsReport::new(),
            DocumentFormat::StructuredJson,
            "inline".to_string(),
        );

        assert_eq!(agent.meta().unwrap().name.as_deref(), Some("UnnamedAgent"));
        assert!(agent.skills().is_empty());
        assert!(agent.memory().is_empty());
        assert_eq!(agent.format(), DocumentFormat::StructuredJson);
        assert_eq!(agent.source(), "inline");
    }

    #[test]
    fn revalidation_is_independent_of_recorded_diagnostics() {
        let agent = ParsedAgent::new(
            AgentDocument::default(),
            DiagnosticsReport::new(),
            DocumentFormat::StructuredYaml,
            "inline".to_string(),
        );
        // Recorded diagnostics are empty, but the incomplete document still
        // fails the structural rules on a fresh pass.
        assert!(agent.diagnostics().is_empty());
        assert!(agent.revalidate().iter().any(|d| d.code == "MISSING_META"));
    }

    #[test]
    fn healed_defaults_pass_revalidation() {
        let agent = ParsedAgent::new(
            apply_defaults(AgentDocument::default()),
            DiagnosticsReport::new(),
            DocumentFormat::StructuredJson,
            "inline".to_string(),
        );
        assert!(agent.revalidate().is_empty());
    }
}
