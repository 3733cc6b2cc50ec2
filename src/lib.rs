//! AIX: Declarative Agent-Definition Parsing
//!
//! Parses agent definitions written as JSON, bounded YAML-like or TOML-like
//! documents, or constrained natural language into one normalized, validated
//! representation with structured diagnostics, behind a single entry point
//! with strict and lenient operating modes.

pub mod agent;
pub mod cache;
pub mod config;
pub mod defaults;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod format;
pub mod heal;
pub mod logging;
pub mod parser;
pub mod plugin;
pub mod validate;

pub use agent::ParsedAgent;
pub use config::ParserConfig;
pub use diagnostics::{Diagnostic, DiagnosticsReport, Severity};
pub use document::AgentDocument;
pub use error::{AixError, ErrorReport};
pub use format::DocumentFormat;
pub use parser::AgentParser;
pub use plugin::Validator;
