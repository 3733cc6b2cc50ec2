//! Parse orchestrator: the single entry point into the pipeline.
//!
//! `parse_path` resolves content from disk (whole-read or streaming based on
//! the configured threshold) and delegates to the shared pipeline that
//! `parse_content` exposes directly: hash → cache probe → format detection →
//! backend → smart defaults → structural validation → self-healing →
//! registered validators → wrapping → cache insertion → strict-mode gate.

use crate::agent::ParsedAgent;
use crate::cache::{self, ContentCache};
use crate::config::ParserConfig;
use crate::defaults::apply_defaults;
use crate::diagnostics::{Diagnostic, DiagnosticsReport};
use crate::document::AgentDocument;
use crate::error::AixError;
use crate::format::{self, json, natural, toml, yaml, DocumentFormat};
use crate::heal::heal;
use crate::plugin::{
    self, ChecksumValidator, DeprecatedFieldsValidator, SemverValidator, Validator,
};
use crate::validate::validate_structure;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::sync::Notify;
use tracing::debug;

const STREAM_CHUNK_SIZE: usize = 64 * 1024;
const INLINE_SOURCE: &str = "<string>";

pub struct AgentParser {
    config: ParserConfig,
    validators: Vec<Arc<dyn Validator>>,
    cache: ContentCache,
}

impl AgentParser {
    pub fn new(config: ParserConfig) -> Self {
        let mut validators: Vec<Arc<dyn Validator>> = Vec::new();
        if config.validate_checksums {
            validators.push(Arc::new(ChecksumValidator));
        }
        validators.push(Arc::new(SemverValidator));
        if !config.allow_deprecated {
            validators.push(Arc::new(DeprecatedFieldsValidator));
        }
        validators.extend(config.validators.iter().cloned());

        let cache = ContentCache::new(config.cache_enabled, config.cache_capacity);
        Self {
            config,
            validators,
            cache,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a document from disk.
    pub async fn parse_path(&self, path: impl AsRef<Path>) -> Result<Arc<ParsedAgent>, AixError> {
        self.parse_path_cancellable(path, None).await
    }

    /// Parse a document from disk with a cancellation signal.
    ///
    /// Existence and size are checked before any content is read. Documents
    /// above the streaming threshold are read in chunks; the chunk loop
    /// observes `cancel` and fails with [`AixError::Cancelled`] when notified.
    pub async fn parse_path_cancellable(
        &self,
        path: impl AsRef<Path>,
        cancel: Option<Arc<Notify>>,
    ) -> Result<Arc<ParsedAgent>, AixError> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await.map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                AixError::SourceNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                AixError::SourceRead {
                    path: path.to_path_buf(),
                    source: err,
                }
            }
        })?;

        if metadata.len() > self.config.max_document_size {
            return Err(AixError::SourceTooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                max: self.config.max_document_size,
            });
        }

        let mut report = DiagnosticsReport::new();
        let content = if metadata.len() > self.config.streaming_threshold {
            report.push(Diagnostic::info(
                "STREAMING_MODE",
                format!("Using streaming read for large document ({} bytes)", metadata.len()),
            ));
            read_streaming(path, cancel).await?
        } else {
            tokio::fs::read_to_string(path).await.map_err(|source| {
                AixError::SourceRead {
                    path: path.to_path_buf(),
                    source,
                }
            })?
        };

        let label = path.to_string_lossy().into_owned();
        self.run_pipeline(&content, Some(&label), report)
    }

    /// Parse in-memory content through the shared pipeline.
    pub fn parse_content(
        &self,
        content: &str,
        source_label: Option<&str>,
    ) -> Result<Arc<ParsedAgent>, AixError> {
        self.run_pipeline(content, source_label, DiagnosticsReport::new())
    }

    fn run_pipeline(
        &self,
        content: &str,
        label: Option<&str>,
        mut report: DiagnosticsReport,
    ) -> Result<Arc<ParsedAgent>, AixError> {
        let source = label.unwrap_or(INLINE_SOURCE);
        let hash = cache::content_hash(content);

        if let Some(cached) = self.cache.get(&hash) {
            debug!(source, "content cache hit");
            return Ok(cached);
        }

        let format = format::detect(content, label, self.config.enable_natural_language);
        debug!(source, %format, "detected document format");
        report.push(Diagnostic::info(
            "FORMAT_DETECTED",
            format!("Detected format: {format}"),
        ));

        let document = match format {
            DocumentFormat::Natural => {
                let document = natural::parse(content, self.config.enable_natural_language)?;
                report.push(Diagnostic::info(
                    "NATURAL_LANGUAGE_PARSED",
                    "Parsed natural language description",
                ));
                document
            }
            DocumentFormat::StructuredJson => AgentDocument::from_value(&json::parse(content)?),
            DocumentFormat::StructuredYaml => AgentDocument::from_value(&yaml::parse(content)?),
            DocumentFormat::StructuredToml => AgentDocument::from_value(&toml::parse(content)?),
            DocumentFormat::Unknown => return Err(AixError::UnsupportedFormat),
        };

        let document = if self.config.enable_smart_defaults {
            apply_defaults(document)
        } else {
            document
        };

        report.extend(validate_structure(&document));

        let document = if self.config.enable_self_healing && report.has_errors() {
            debug!(source, errors = report.error_count(), "healing document");
            heal(document, &mut report)
        } else {
            document
        };

        plugin::run_validators(&self.validators, &document, &mut report);

        let agent = Arc::new(ParsedAgent::new(
            document,
            report,
            format,
            source.to_string(),
        ));

        self.cache.insert(hash, Arc::clone(&agent));

        if self.config.strict_mode && agent.diagnostics().has_errors() {
            return Err(AixError::ValidationFailed {
                report: agent.diagnostics().clone(),
            });
        }

        Ok(agent)
    }
}

async fn read_streaming(path: &Path, cancel: Option<Arc<Notify>>) -> Result<String, AixError> {
    let read_error = |source| AixError::SourceRead {
        path: path.to_path_buf(),
        source,
    };

    let file = tokio::fs::File::open(path).await.map_err(read_error)?;
    let mut reader = tokio::io::BufReader::new(file);
    let mut chunk = vec![0u8; STREAM_CHUNK_SIZE];
    let mut collected = Vec::new();

    loop {
        let read = match &cancel {
            Some(notify) => tokio::select! {
                biased;
                _ = notify.notified() => return Err(AixError::Cancelled),
                read = reader.read(&mut chunk) => read,
            },
            None => reader.read(&mut chunk).await,
        };
        let count = read.map_err(read_error)?;
        if count == 0 {
            break;
        }
        collected.extend_from_slice(&chunk[..count]);
    }

    String::from_utf8(collected).map_err(|_| AixError::SourceRead {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, "document is not valid UTF-8"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lenient() -> ParserConfig {
        ParserConfig {
            strict_mode: false,
            ..ParserConfig::default()
        }
    }

    #[test]
    fn json_content_parses_into_a_normalized_agent() {
        let parser = AgentParser::new(ParserConfig::default());
        let agent = parser
            .parse_content(
                r#"{"meta": {"name": "Atlas", "version": "2.1.0"}, "persona": {"role": "analyst"}, "skills": []}"#,
                None,
            )
            .unwrap();

        let meta = agent.meta().unwrap();
        assert_eq!(meta.id.as_deref(), Some("agent:atlas:2.1.0"));
        assert_eq!(agent.format(), DocumentFormat::StructuredJson);
        assert!(agent.diagnostics().contains_code("FORMAT_DETECTED"));
    }

    #[test]
    fn unknown_format_is_fatal() {
        let parser = AgentParser::new(ParserConfig::default());
        let err = parser.parse_content("no structure here", None).unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn strict_mode_raises_an_aggregate_failure() {
        let parser = AgentParser::new(ParserConfig {
            enable_smart_defaults: false,
            enable_self_healing: false,
            ..ParserConfig::default()
        });
        let err = parser.parse_content("{}", None).unwrap_err();
        match err {
            AixError::ValidationFailed { report } => {
                assert!(report.contains_code("MISSING_META"));
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn lenient_mode_returns_the_agent_with_its_diagnostics() {
        let parser = AgentParser::new(ParserConfig {
            enable_smart_defaults: false,
            enable_self_healing: false,
            strict_mode: false,
            ..ParserConfig::default()
        });
        let agent = parser.parse_content("{}", None).unwrap();
        assert!(agent.diagnostics().contains_code("MISSING_META"));
        assert!(agent.meta().is_none());
    }

    #[test]
    fn per_call_diagnostics_do_not_leak_between_operations() {
        let parser = AgentParser::new(ParserConfig {
            enable_smart_defaults: false,
            enable_self_healing: false,
            ..lenient()
        });
        let incomplete = parser.parse_content("{}", None).unwrap();
        let complete = parser
            .parse_content(
                r#"{"meta": {"name": "B", "version": "1.0.0"}, "persona": {}, "skills": []}"#,
                None,
            )
            .unwrap();

        // The first operation's failures stay on its own report.
        assert!(incomplete.diagnostics().contains_code("MISSING_META"));
        assert!(!complete.diagnostics().contains_code("MISSING_META"));
        let format_records = complete
            .diagnostics()
            .records()
            .iter()
            .filter(|d| d.code == "FORMAT_DETECTED")
            .count();
        assert_eq!(format_records, 1);
    }
}
