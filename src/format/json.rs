//! JSON backend: the one complete, fully standard format parser.

use crate::error::AixError;
use serde_json::Value;

/// Parse a JSON document into a raw value tree.
pub fn parse(content: &str) -> Result<Value, AixError> {
    serde_json::from_str(content).map_err(|err| AixError::JsonSyntax {
        message: err.to_string(),
    })
}
