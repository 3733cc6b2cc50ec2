//! Bounded YAML-like backend.
//!
//! Deliberately not a general YAML parser: it accepts the flat and
//! one-level-nested shape agent definitions use — top-level scalars, or
//! sections whose entries are scalars. Comments, blank lines, and `---`
//! document markers are skipped. Anything deeper is a syntax error.

use crate::error::AixError;
use crate::format::coerce_scalar;
use serde_json::{Map, Value};

pub fn parse(content: &str) -> Result<Value, AixError> {
    let mut root = Map::new();
    let mut section: Option<(String, Map<String, Value>)> = None;

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "---" {
            continue;
        }

        let indented = line.starts_with(' ') || line.starts_with('\t');
        let Some((key, rest)) = trimmed.split_once(':') else {
            return Err(syntax(index, "expected `key: value` or `section:`"));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(syntax(index, "entry is missing a key"));
        }
        let rest = rest.trim();

        if indented {
            let Some((_, entries)) = section.as_mut() else {
                return Err(syntax(index, "indented entry outside of a section"));
            };
            if rest.is_empty() {
                return Err(syntax(index, "sections are limited to one level of scalar entries"));
            }
            entries.insert(key.to_string(), coerce_scalar(rest));
        } else {
            flush(&mut root, section.take());
            if rest.is_empty() {
                section = Some((key.to_string(), Map::new()));
            } else {
                root.insert(key.to_string(), coerce_scalar(rest));
            }
        }
    }

    flush(&mut root, section.take());
    Ok(Value::Object(root))
}

fn flush(root: &mut Map<String, Value>, section: Option<(String, Map<String, Value>)>) {
    if let Some((name, entries)) = section {
        root.insert(name, Value::Object(entries));
    }
}

fn syntax(index: usize, message: &str) -> AixError {
    AixError::YamlSyntax {
        message: message.to_string(),
        line: index + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sections_of_scalars() {
        let value = parse(
            "---\n# agent definition\nmeta:\n  name: Atlas\n  version: 2.1.0\npersona:\n  role: analyst\nactive: true\n",
        )
        .unwrap();

        assert_eq!(value["meta"]["name"], "Atlas");
        assert_eq!(value["meta"]["version"], "2.1.0");
        assert_eq!(value["persona"]["role"], "analyst");
        assert_eq!(value["active"], Value::Bool(true));
    }

    #[test]
    fn coerces_quoted_and_typed_scalars() {
        let value = parse("meta:\n  name: \"Quoted Name\"\n  retries: 3\n  extra: null\n").unwrap();
        assert_eq!(value["meta"]["name"], "Quoted Name");
        assert_eq!(value["meta"]["retries"], Value::from(3));
        assert_eq!(value["meta"]["extra"], Value::Null);
    }

    #[test]
    fn a_line_without_a_colon_is_a_syntax_error() {
        let err = parse("meta:\n  name Atlas\n").unwrap_err();
        assert_eq!(err.code(), "YAML_PARSE_ERROR");
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn indentation_outside_a_section_is_rejected() {
        let err = parse("  name: Atlas\n").unwrap_err();
        assert_eq!(err.code(), "YAML_PARSE_ERROR");
    }

    #[test]
    fn deeper_nesting_is_rejected() {
        let err = parse("meta:\n  nested:\n    too: deep\n").unwrap_err();
        assert_eq!(err.code(), "YAML_PARSE_ERROR");
    }
}
