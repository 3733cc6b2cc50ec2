//! Bounded TOML-like backend.
//!
//! Accepts `[section]` headers with `key = value` entries, plus bare
//! top-level pairs. One section level only; comments and blank lines are
//! skipped.

use crate::error::AixError;
use crate::format::coerce_scalar;
use serde_json::{Map, Value};

pub fn parse(content: &str) -> Result<Value, AixError> {
    let mut root = Map::new();
    let mut section: Option<(String, Map<String, Value>)> = None;

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if trimmed.starts_with('[') {
            if !trimmed.ends_with(']') {
                return Err(syntax(index, "unbalanced section header"));
            }
            let name = trimmed[1..trimmed.len() - 1].trim();
            if name.is_empty() {
                return Err(syntax(index, "section header is missing a name"));
            }
            flush(&mut root, section.take());
            section = Some((name.to_string(), Map::new()));
            continue;
        }

        let Some((key, value)) = trimmed.split_once('=') else {
            return Err(syntax(index, "expected `key = value` or `[section]`"));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(syntax(index, "entry is missing a key"));
        }
        let value = coerce_scalar(value);
        match section.as_mut() {
            Some((_, entries)) => {
                entries.insert(key.to_string(), value);
            }
            None => {
                root.insert(key.to_string(), value);
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
    AixError::TomlSyntax {
        message: message.to_string(),
        line: index + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sections_and_bare_pairs() {
        let value = parse(
            "# definition\nactive = true\n\n[meta]\nname = \"Atlas\"\nversion = \"2.1.0\"\n\n[persona]\nrole = \"researcher\"\n",
        )
        .unwrap();

        assert_eq!(value["active"], Value::Bool(true));
        assert_eq!(value["meta"]["name"], "Atlas");
        assert_eq!(value["persona"]["role"], "researcher");
    }

    #[test]
    fn unbalanced_section_header_is_rejected() {
        let err = parse("[meta\nname = \"x\"\n").unwrap_err();
        assert_eq!(err.code(), "TOML_PARSE_ERROR");
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn a_line_without_an_equals_is_rejected() {
        let err = parse("[meta]\nname \"x\"\n").unwrap_err();
        assert_eq!(err.code(), "TOML_PARSE_ERROR");
    }

    #[test]
    fn numbers_and_quotes_coerce() {
        let value = parse("[limits]\nretries = 3\nrate = 0.5\nlabel = 'raw'\n").unwrap();
        assert_eq!(value["limits"]["retries"], Value::from(3));
        assert_eq!(value["limits"]["rate"], Value::from(0.5));
        assert_eq!(value["limits"]["label"], "raw");
    }
}
