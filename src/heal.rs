//! Self-healing: synthesize missing required fields after validation fails.
//!
//! Healing applies the same filling as the smart-defaults applier, recording
//! a fix diagnostic for everything it synthesized. It does not retract the
//! original error diagnostics it compensates for — the audit trail of what
//! was wrong is preserved, so a strict-mode run can still fail after a
//! successful heal.

use crate::defaults::apply_defaults;
use crate::diagnostics::{Diagnostic, DiagnosticsReport};
use crate::document::AgentDocument;

pub fn heal(doc: AgentDocument, report: &mut DiagnosticsReport) -> AgentDocument {
    report.push(Diagnostic::info(
        "SELF_HEALING_START",
        "Attempting self-healing validation",
    ));

    let (missing_meta, missing_name, missing_version) = match &doc.meta {
        None => (true, false, false),
        Some(meta) => (false, meta.name.is_none(), meta.version.is_none()),
    };
    let missing_persona = doc.persona.is_none();
    let missing_skills = doc.skills.is_none();

    let healed = apply_defaults(doc);

    if missing_meta {
        report.push(Diagnostic::fix("ADDED_META", "Synthesized missing meta section"));
    }
    if missing_name {
        report.push(Diagnostic::fix("ADDED_NAME", "Synthesized missing meta.name field"));
    }
    if missing_version {
        report.push(Diagnostic::fix(
            "ADDED_VERSION",
            "Synthesized missing meta.version field",
        ));
    }
    if missing_persona {
        report.push(Diagnostic::fix(
            "ADDED_PERSONA",
            "Synthesized missing persona section",
        ));
    }
    if missing_skills {
        report.push(Diagnostic::fix(
            "ADDED_SKILLS",
            "Synthesized missing skills section",
        ));
    }

    report.push(Diagnostic::info(
        "SELF_HEALING_COMPLETE",
        format!("Applied {} fix(es)", report.fix_count()),
    ));

    healed
}
