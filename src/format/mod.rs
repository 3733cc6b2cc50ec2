//! Document format detection and parser backends.
//!
//! Detection is an ordered rule table evaluated top to bottom: natural
//! language phrase heuristics (only when enabled), then source-label
//! extensions, then content sniffing. The first matching rule wins, which
//! makes the precedence a visible data structure rather than control flow.

pub mod json;
pub mod natural;
pub mod toml;
pub mod yaml;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Recognized document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFormat {
    #[serde(rename = "natural")]
    Natural,
    #[serde(rename = "structured-json")]
    StructuredJson,
    #[serde(rename = "structured-yaml-like")]
    StructuredYaml,
    #[serde(rename = "structured-toml-like")]
    StructuredToml,
    #[serde(rename = "unknown")]
    Unknown,
}

impl DocumentFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Natural => "natural",
            Self::StructuredJson => "structured-json",
            Self::StructuredYaml => "structured-yaml-like",
            Self::StructuredToml => "structured-toml-like",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct DetectInput<'a> {
    content: &'a str,
    label: Option<&'a str>,
    natural_enabled: bool,
}

/// One detection rule: a predicate and the format it selects.
struct DetectionRule {
    format: DocumentFormat,
    applies: fn(&DetectInput<'_>) -> bool,
}

/// Evaluated strictly in order; extension rules come before content sniffing
/// so a recognized extension always overrides content shape.
static DETECTION_RULES: &[DetectionRule] = &[
    DetectionRule { format: DocumentFormat::Natural, applies: natural_phrases },
    DetectionRule { format: DocumentFormat::StructuredJson, applies: json_extension },
    DetectionRule { format: DocumentFormat::StructuredYaml, applies: yaml_extension },
    DetectionRule { format: DocumentFormat::StructuredToml, applies: toml_extension },
    DetectionRule { format: DocumentFormat::StructuredJson, applies: json_shape },
    DetectionRule { format: DocumentFormat::StructuredYaml, applies: yaml_shape },
    DetectionRule { format: DocumentFormat::StructuredToml, applies: toml_shape },
];

/// Detect the format of raw content, optionally hinted by a source label.
pub fn detect(content: &str, label: Option<&str>, natural_enabled: bool) -> DocumentFormat {
    let input = DetectInput { content, label, natural_enabled };
    DETECTION_RULES
        .iter()
        .find(|rule| (rule.applies)(&input))
        .map(|rule| rule.format)
        .unwrap_or(DocumentFormat::Unknown)
}

const NATURAL_MARKERS: [&str; 6] = [
    "this is a",
    "this is an",
    "agent called",
    "named",
    "can help",
    "capable of",
];

fn natural_phrases(input: &DetectInput<'_>) -> bool {
    if !input.natural_enabled {
        return false;
    }
    let lower = input.content.to_lowercase();
    NATURAL_MARKERS.iter().any(|marker| lower.contains(marker))
}

fn has_extension(input: &DetectInput<'_>, extensions: &[&str]) -> bool {
    input
        .label
        .map(|label| extensions.iter().any(|ext| label.ends_with(ext)))
        .unwrap_or(false)
}

fn json_extension(input: &DetectInput<'_>) -> bool {
    has_extension(input, &[".json"])
}

fn yaml_extension(input: &DetectInput<'_>) -> bool {
    has_extension(input, &[".yaml", ".yml"])
}

fn toml_extension(input: &DetectInput<'_>) -> bool {
    has_extension(input, &[".toml"])
}

fn json_shape(input: &DetectInput<'_>) -> bool {
    let trimmed = input.content.trim();
    trimmed.starts_with('{') && trimmed.ends_with('}')
}

fn yaml_shape(input: &DetectInput<'_>) -> bool {
    input.content.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.starts_with('#') {
            return false;
        }
        matches!(trimmed.split_once(':'), Some((key, _)) if !key.trim().is_empty())
    })
}

fn toml_shape(input: &DetectInput<'_>) -> bool {
    let has_section = input.content.lines().any(|line| {
        let trimmed = line.trim();
        trimmed.len() > 2 && trimmed.starts_with('[') && trimmed.ends_with(']')
    });
    has_section && input.content.lines().any(|line| line.contains('='))
}

/// Coerce a raw scalar token into a typed JSON value.
///
/// Quoted tokens become strings verbatim; `true`/`false`/`null` become their
/// typed equivalents; fully numeric tokens become numbers; everything else
/// stays a string.
pub(crate) fn coerce_scalar(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 {
        let quoted = (trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\''));
        if quoted {
            return Value::String(trimmed[1..trimmed.len() - 1].to_string());
        }
    }
    match trimmed {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => {
            if let Ok(int) = trimmed.parse::<i64>() {
                return Value::Number(int.into());
            }
            if let Ok(float) = trimmed.parse::<f64>() {
                if let Some(number) = serde_json::Number::from_f64(float) {
                    return Value::Number(number);
                }
            }
            Value::String(trimmed.to_string())
        }
    }
}
