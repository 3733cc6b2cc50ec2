//! Normalized agent document model and identity composition.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity section of an agent document.
///
/// Fields are optional because backends may produce partial documents; the
/// smart-defaults applier and the self-healing engine fill them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Persona section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// One declared skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// One tool binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolBinding {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Tool bindings grouped by mechanism; only API bindings are modeled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tools {
    #[serde(default)]
    pub apis: Vec<ToolBinding>,
}

/// The normalized in-memory representation of an agent definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<Persona>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<Skill>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Tools>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub memory: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub security: Map<String, Value>,
    /// Unrecognized top-level sections, preserved for validator capabilities.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const KNOWN_SECTIONS: [&str; 6] = ["meta", "persona", "skills", "tools", "memory", "security"];

impl AgentDocument {
    /// Convert a raw backend value tree into the typed document shape.
    ///
    /// Conversion is lenient: a section with an unexpected shape is treated as
    /// absent and surfaces later as a structural diagnostic rather than a
    /// conversion failure.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };

        let skills = map.get("skills").and_then(Value::as_array).map(|items| {
            items.iter().filter_map(skill_from_value).collect::<Vec<_>>()
        });

        let extra = map
            .iter()
            .filter(|(key, _)| !KNOWN_SECTIONS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            meta: map.get("meta").and_then(Value::as_object).map(meta_from_map),
            persona: map
                .get("persona")
                .and_then(Value::as_object)
                .map(persona_from_map),
            skills,
            tools: map
                .get("tools")
                .and_then(Value::as_object)
                .map(tools_from_map),
            memory: section_map(map, "memory"),
            security: section_map(map, "security"),
            extra,
        }
    }
}

fn section_map(map: &Map<String, Value>, key: &str) -> Map<String, Value> {
    map.get(key)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn meta_from_map(map: &Map<String, Value>) -> Meta {
    Meta {
        name: map.get("name").and_then(scalar_string),
        version: map.get("version").and_then(scalar_string),
        id: map.get("id").and_then(scalar_string),
    }
}

fn persona_from_map(map: &Map<String, Value>) -> Persona {
    Persona {
        role: map.get("role").and_then(scalar_string),
    }
}

fn skill_from_value(value: &Value) -> Option<Skill> {
    let map = value.as_object()?;
    Some(Skill {
        name: map.get("name").and_then(scalar_string)?,
        description: map
            .get("description")
            .and_then(scalar_string)
            .unwrap_or_default(),
    })
}

fn tools_from_map(map: &Map<String, Value>) -> Tools {
    let apis = map
        .get("apis")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let api = item.as_object()?;
                    Some(ToolBinding {
                        name: api.get("name").and_then(scalar_string)?,
                        kind: api
                            .get("type")
                            .and_then(scalar_string)
                            .unwrap_or_else(|| "api".to_string()),
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    Tools { apis }
}

/// Lowercase a name and hyphenate its whitespace runs.
pub fn slug(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Deterministic agent identity: `agent:<slug(name)>:<version>`.
pub fn compose_id(name: &str, version: &str) -> String {
    format!("agent:{}:{}", slug(name), version)
}
