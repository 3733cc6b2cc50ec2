//! Smart defaults: the baseline filling applied before validation.

use crate::document::{compose_id, AgentDocument, Meta, Persona, Tools};

pub const DEFAULT_NAME: &str = "UnnamedAgent";
pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_ROLE: &str = "assistant";

/// Fill missing identity, persona, skills, and tools fields.
///
/// `meta.id` is recomputed from name and version on every application, so a
/// hand-set id can never drift from the identity fields. Idempotent.
pub fn apply_defaults(mut doc: AgentDocument) -> AgentDocument {
    let meta = doc.meta.get_or_insert_with(Meta::default);
    let name = meta
        .name
        .get_or_insert_with(|| DEFAULT_NAME.to_string())
        .clone();
    let version = meta
        .version
        .get_or_insert_with(|| DEFAULT_VERSION.to_string())
        .clone();
    meta.id = Some(compose_id(&name, &version));

    let persona = doc.persona.get_or_insert_with(Persona::default);
    if persona.role.is_none() {
        persona.role = Some(DEFAULT_ROLE.to_string());
    }

    if doc.skills.is_none() {
        doc.skills = Some(Vec::new());
    }
    if doc.tools.is_none() {
        doc.tools = Some(Tools::default());
    }

    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Skill;
    use proptest::prelude::*;

    #[test]
    fn empty_document_gets_the_full_default_identity() {
        let doc = apply_defaults(AgentDocument::default());
        let meta = doc.meta.unwrap();
        assert_eq!(meta.name.as_deref(), Some("UnnamedAgent"));
        assert_eq!(meta.version.as_deref(), Some("1.0.0"));
        assert_eq!(meta.id.as_deref(), Some("agent:unnamedagent:1.0.0"));
        assert_eq!(doc.persona.unwrap().role.as_deref(), Some("assistant"));
        assert_eq!(doc.skills.unwrap(), Vec::<Skill>::new());
        assert!(doc.tools.unwrap().apis.is_empty());
    }

    #[test]
    fn existing_fields_are_preserved() {
        let doc = AgentDocument {
            meta: Some(Meta {
                name: Some("Atlas".into()),
                version: Some("2.1.0".into()),
                id: None,
            }),
            persona: Some(Persona {
                role: Some("analyst".into()),
            }),
            ..AgentDocument::default()
        };
        let doc = apply_defaults(doc);
        let meta = doc.meta.unwrap();
        assert_eq!(meta.name.as_deref(), Some("Atlas"));
        assert_eq!(meta.id.as_deref(), Some("agent:atlas:2.1.0"));
        assert_eq!(doc.persona.unwrap().role.as_deref(), Some("analyst"));
    }

    #[test]
    fn inconsistent_hand_set_ids_are_recomputed() {
        let doc = AgentDocument {
            meta: Some(Meta {
                name: Some("Travel Agent".into()),
                version: Some("3.0.0".into()),
                id: Some("agent:wrong:0.0.1".into()),
            }),
            ..AgentDocument::default()
        };
        let doc = apply_defaults(doc);
        assert_eq!(
            doc.meta.unwrap().id.as_deref(),
            Some("agent:travel-agent:3.0.0")
        );
    }

    fn partial_documents() -> impl Strategy<Value = AgentDocument> {
        let meta = proptest::option::of(
            ("[A-Za-z0-9 ]{0,16}", proptest::option::of("[0-9]\\.[0-9]\\.[0-9]")).prop_map(
                |(name, version)| Meta {
                    name: (!name.trim().is_empty()).then(|| name),
                    version,
                    id: None,
                },
            ),
        );
        let persona = proptest::option::of(
            proptest::option::of("[a-z]{1,10}").prop_map(|role| Persona { role }),
        );
        (meta, persona).prop_map(|(meta, persona)| AgentDocument {
            meta,
            persona,
            ..AgentDocument::default()
        })
    }

    proptest! {
        #[test]
        fn applying_defaults_twice_equals_applying_once(doc in partial_documents()) {
            let once = apply_defaults(doc);
            let twice = apply_defaults(once.clone());
            prop_assert_eq!(once, twice);
        }
    }
}
