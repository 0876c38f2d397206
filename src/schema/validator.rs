//! Catalog schema validation with detailed error reporting

use jsonschema::{validator_for, ValidationError as JsonSchemaError, Validator as JsonValidator};
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::schema::assets;

/// Validation error with source location information
#[derive(Debug, Error, Diagnostic)]
#[error("Catalog schema validation failed: {summary}")]
#[diagnostic(code(pcfg::catalog::schema))]
pub struct ValidationError {
    summary: String,

    #[source_code]
    src: NamedSource<String>,

    #[related]
    violations: Vec<SchemaViolation>,
}

/// A single schema violation
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct SchemaViolation {
    #[label("{}", self.hint)]
    span: SourceSpan,

    message: String,
    hint: String,

    #[help]
    help: Option<String>,
}

impl SchemaViolation {
    pub fn new(message: String, hint: String, span: SourceSpan, help: Option<String>) -> Self {
        Self {
            span,
            message,
            hint,
            help,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ValidationError {
    pub fn new(filename: &str, source: &str, violations: Vec<SchemaViolation>) -> Self {
        let count = violations.len();
        let summary = if count == 1 {
            "1 error".to_string()
        } else {
            format!("{} errors", count)
        };
        Self {
            summary,
            src: NamedSource::new(filename, source.to_string()),
            violations,
        }
    }

    /// Get the number of violations
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Iterate the individual violations
    pub fn violations(&self) -> impl Iterator<Item = &SchemaViolation> {
        self.violations.iter()
    }
}

/// Validator for catalog documents, compiled from the embedded schema
pub struct CatalogValidator {
    compiled: Option<JsonValidator>,
}

impl CatalogValidator {
    /// Compile the embedded catalog schema
    pub fn new() -> Self {
        let compiled = assets::catalog_schema()
            .and_then(|s| serde_json::from_str::<JsonValue>(&s).ok())
            .and_then(|schema| validator_for(&schema).ok());

        if compiled.is_none() {
            tracing::warn!("catalog schema unavailable, skipping schema validation");
        }

        Self { compiled }
    }

    /// Validate a parsed catalog document, reporting every violation
    ///
    /// `content` is the original text, used to point at the offending key.
    pub fn validate(
        &self,
        document: &JsonValue,
        content: &str,
        filename: &str,
    ) -> Result<(), ValidationError> {
        // No schema available - validation passes
        let Some(schema) = &self.compiled else {
            return Ok(());
        };

        let violations: Vec<SchemaViolation> = schema
            .iter_errors(document)
            .map(|e| error_to_violation(content, &e))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(filename, content, violations))
        }
    }
}

impl Default for CatalogValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a JSON Schema validation error to our violation format
fn error_to_violation(content: &str, error: &JsonSchemaError) -> SchemaViolation {
    let path = error.instance_path.to_string();
    let message = format_schema_error(error);
    let hint = format_error_hint(error);
    let help = generate_help_message(error);

    let span = find_path_span(content, &path);

    SchemaViolation::new(message, hint, span, help)
}

/// Format a JSON Schema error into a user-friendly message
fn format_schema_error(error: &JsonSchemaError) -> String {
    let path = if error.instance_path.as_str().is_empty() {
        "document root".to_string()
    } else {
        format!("'{}'", error.instance_path)
    };

    match &error.kind {
        jsonschema::error::ValidationErrorKind::Required { property } => {
            let prop_str = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            format!("Missing required field: {} at {}", prop_str, path)
        }
        jsonschema::error::ValidationErrorKind::Type { kind } => {
            format!("Wrong type at {}: expected {:?}", path, kind)
        }
        jsonschema::error::ValidationErrorKind::MinLength { limit } => {
            format!("Value at {} is too short: minimum {} characters", path, limit)
        }
        jsonschema::error::ValidationErrorKind::Minimum { limit } => {
            format!("Value at {} is too small: minimum {}", path, limit)
        }
        jsonschema::error::ValidationErrorKind::AdditionalProperties { unexpected } => {
            format!("Unknown field(s) at {}: {}", path, unexpected.join(", "))
        }
        _ => {
            format!("Validation error at {}: {}", path, error)
        }
    }
}

/// Generate a short hint for the error label
fn format_error_hint(error: &JsonSchemaError) -> String {
    match &error.kind {
        jsonschema::error::ValidationErrorKind::Required { .. } => {
            "required field missing".to_string()
        }
        jsonschema::error::ValidationErrorKind::Type { .. } => "wrong type".to_string(),
        jsonschema::error::ValidationErrorKind::MinLength { .. } => "too short".to_string(),
        jsonschema::error::ValidationErrorKind::Minimum { .. } => "too small".to_string(),
        jsonschema::error::ValidationErrorKind::AdditionalProperties { .. } => {
            "unknown field".to_string()
        }
        _ => "validation error".to_string(),
    }
}

/// Generate a help message with suggestions for fixing the error
fn generate_help_message(error: &JsonSchemaError) -> Option<String> {
    match &error.kind {
        jsonschema::error::ValidationErrorKind::Required { property } => {
            let prop_str = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            Some(format!("Add the '{}' field to this record", prop_str))
        }
        jsonschema::error::ValidationErrorKind::Type { kind } => {
            Some(format!("Expected value of type: {:?}", kind))
        }
        jsonschema::error::ValidationErrorKind::AdditionalProperties { unexpected } => {
            if unexpected.len() == 1 {
                Some(format!(
                    "Remove the '{}' field or check spelling (keys are camelCase, e.g. processId)",
                    unexpected[0]
                ))
            } else {
                Some("Remove unknown fields or check spelling".to_string())
            }
        }
        _ => None,
    }
}

fn first_line_span(content: &str) -> SourceSpan {
    let len = content.find('\n').unwrap_or(content.len()).max(1);
    (0, len).into()
}

/// Find the span for a JSON pointer (e.g. "/materials/3/processId") in the document text
fn find_path_span(content: &str, json_path: &str) -> SourceSpan {
    let parts: Vec<&str> = json_path.split('/').filter(|s| !s.is_empty()).collect();

    // Search for the last named key; array indices point back at their parent list
    let key = parts.iter().rev().find(|p| p.parse::<usize>().is_err());

    match key {
        Some(key) => find_key_span(content, key).unwrap_or_else(|| first_line_span(content)),
        None => first_line_span(content),
    }
}

/// Find the span of a YAML (`key:`) or JSON (`"key":`) key
fn find_key_span(content: &str, key: &str) -> Option<SourceSpan> {
    let yaml_pattern = format!("{}:", key);
    let json_pattern = format!("\"{}\"", key);

    let mut offset = 0;
    for line in content.lines() {
        let trimmed = line.trim_start().trim_start_matches("- ");
        if trimmed.starts_with(&yaml_pattern) || trimmed.starts_with(&json_pattern) {
            let key_start = offset + (line.len() - trimmed.len());
            return Some((key_start, trimmed.len().max(1)).into());
        }
        offset += line.len() + 1;
    }
    None
}
