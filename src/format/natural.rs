//! Constrained natural-language backend.
//!
//! Extracts an agent definition from prose such as "This is an agent called
//! Atlas version 2.1.0 that can detect anomalies and uses the Stripe api."
//! Each extraction rule is independent; role classification is an ordered
//! rule table where the first category with any keyword present wins.

use crate::defaults::{DEFAULT_NAME, DEFAULT_VERSION};
use crate::document::{compose_id, AgentDocument, Meta, Persona, Skill, ToolBinding, Tools};
use crate::error::AixError;
use once_cell::sync::Lazy;
use regex::Regex;

const MAX_SKILLS: usize = 5;

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(?:(?:agent\s+)?(?:called|named)|agent)\s+(?:"([^"\n]+)"|'([^'\n]+)'|([A-Za-z0-9][A-Za-z0-9_-]*))"#,
    )
    .expect("static pattern compiles")
});

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bversion\s+(\d+\.\d+\.\d+)").expect("static pattern compiles"));

static SKILL_RES: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)\b(?:can|able to|capable of)\s+([^.\n]+)").expect("static pattern compiles"),
        Regex::new(r"(?i)\b(?:detect|analyz|identif)[a-z]*\s+([^.\n]+)").expect("static pattern compiles"),
    ]
});

static TOOL_RES: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)\b(?:uses?|integrates?|calls?)\s+(?:(?:the|a|an)\s+)?([A-Za-z0-9_-]+)")
            .expect("static pattern compiles"),
        Regex::new(r"(?i)\b(?:api|endpoint|service)\s+(?:(?:the|a|an)\s+)?([A-Za-z0-9_-]+)")
            .expect("static pattern compiles"),
    ]
});

/// Role categories with their trigger keyword stems, checked in order.
static ROLE_RULES: &[(&str, &[&str])] = &[
    ("assistant", &["assist", "help", "support"]),
    ("analyst", &["analyz", "detect", "pattern", "audit"]),
    ("researcher", &["research", "investigate", "explore"]),
];

/// Extract an agent document from a natural-language description.
///
/// Fails with [`AixError::NaturalLanguageDisabled`] unless the mode was
/// explicitly enabled in the parser configuration.
pub fn parse(content: &str, enabled: bool) -> Result<AgentDocument, AixError> {
    if !enabled {
        return Err(AixError::NaturalLanguageDisabled);
    }

    let name = extract_name(content).unwrap_or_else(|| DEFAULT_NAME.to_string());
    let version = extract_version(content).unwrap_or_else(|| DEFAULT_VERSION.to_string());
    let id = compose_id(&name, &version);

    Ok(AgentDocument {
        meta: Some(Meta {
            name: Some(name),
            version: Some(version),
            id: Some(id),
        }),
        persona: Some(Persona {
            role: Some(classify_role(content).to_string()),
        }),
        skills: Some(extract_skills(content)),
        tools: Some(extract_tools(content)),
        ..AgentDocument::default()
    })
}

fn extract_name(content: &str) -> Option<String> {
    let captures = NAME_RE.captures(content)?;
    let token = captures
        .get(1)
        .or_else(|| captures.get(2))
        .or_else(|| captures.get(3))?;
    let token = token.as_str().trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn extract_version(content: &str) -> Option<String> {
    VERSION_RE
        .captures(content)
        .map(|captures| captures[1].to_string())
}

fn classify_role(content: &str) -> &'static str {
    let lower = content.to_lowercase();
    ROLE_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(role, _)| *role)
        .unwrap_or("assistant")
}

fn extract_skills(content: &str) -> Vec<Skill> {
    let mut skills = Vec::new();
    for pattern in SKILL_RES.iter() {
        for captures in pattern.captures_iter(content) {
            if skills.len() >= MAX_SKILLS {
                return skills;
            }
            let phrase = captures[1].trim().to_string();
            if phrase.is_empty() {
                continue;
            }
            skills.push(Skill {
                name: phrase
                    .to_lowercase()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join("_"),
                description: phrase,
            });
        }
    }
    skills
}

fn extract_tools(content: &str) -> Tools {
    let mut apis = Vec::new();
    for pattern in TOOL_RES.iter() {
        for captures in pattern.captures_iter(content) {
            apis.push(ToolBinding {
                name: captures[1].trim().to_string(),
                kind: "api".to_string(),
            });
        }
    }
    Tools { apis }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATLAS: &str =
        "This is an agent called Atlas version 2.1.0 that can detect anomalies and uses the Stripe api.";

    #[test]
    fn disabled_mode_is_a_fatal_error() {
        let err = parse(ATLAS, false).unwrap_err();
        assert_eq!(err.code(), "NATURAL_LANGUAGE_DISABLED");
        assert!(err.suggestion().unwrap().contains("enable_natural_language"));
    }

    #[test]
    fn extracts_identity_from_the_atlas_sentence() {
        let doc = parse(ATLAS, true).unwrap();
        let meta = doc.meta.unwrap();
        assert_eq!(meta.name.as_deref(), Some("Atlas"));
        assert_eq!(meta.version.as_deref(), Some("2.1.0"));
        assert_eq!(meta.id.as_deref(), Some("agent:atlas:2.1.0"));
    }

    #[test]
    fn extracts_skills_and_tool_bindings() {
        let doc = parse(ATLAS, true).unwrap();
        let skills = doc.skills.unwrap();
        assert!(skills.iter().any(|s| s.description.contains("detect anomalies")));
        let tools = doc.tools.unwrap();
        assert!(tools.apis.iter().any(|api| api.name == "Stripe"));
        assert!(tools.apis.iter().all(|api| api.kind == "api"));
    }

    #[test]
    fn role_table_is_ordered_first_match_wins() {
        let doc = parse("An agent named Scout that can help explore data.", true).unwrap();
        // "help" hits the assistant row before "explore" reaches researcher.
        assert_eq!(doc.persona.unwrap().role.as_deref(), Some("assistant"));

        let doc = parse(ATLAS, true).unwrap();
        assert_eq!(doc.persona.unwrap().role.as_deref(), Some("analyst"));
    }

    #[test]
    fn quoted_names_keep_their_spacing() {
        let doc = parse("An agent called \"Atlas Prime\" version 1.2.3.", true).unwrap();
        assert_eq!(doc.meta.unwrap().name.as_deref(), Some("Atlas Prime"));
    }

    #[test]
    fn missing_identity_falls_back_to_defaults() {
        let doc = parse("This is a tool that is capable of sorting numbers.", true).unwrap();
        let meta = doc.meta.unwrap();
        assert_eq!(meta.name.as_deref(), Some(DEFAULT_NAME));
        assert_eq!(meta.version.as_deref(), Some(DEFAULT_VERSION));
    }

    #[test]
    fn skills_are_capped_at_five() {
        let content = "It can run. It can jump. It can swim. It can fly. It can dig. It can sing.";
        let doc = parse(content, true).unwrap();
        assert_eq!(doc.skills.unwrap().len(), 5);
    }
}
