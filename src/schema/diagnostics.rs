//! Catalog syntax errors with source spans

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// YAML or JSON syntax error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("{format} syntax error: {message}")]
#[diagnostic(code(pcfg::catalog::syntax))]
pub struct SyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    format: &'static str,

    /// The underlying error message
    message: String,
}

impl SyntaxError {
    /// Create a syntax error from a serde_yml error
    pub fn from_yaml_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        Self::at_location("YAML", err.to_string(), source, filename, line, column)
    }

    /// Create a syntax error from a serde_json error
    pub fn from_json_error(err: &serde_json::Error, source: &str, filename: &str) -> Self {
        let line = err.line().max(1);
        let column = err.column().max(1);

        Self::at_location("JSON", err.to_string(), source, filename, line, column)
    }

    fn at_location(
        format: &'static str,
        message: String,
        source: &str,
        filename: &str,
        line: usize,
        column: usize,
    ) -> Self {
        let offset = line_col_to_offset(source, line, column);
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            format,
            message,
        }
    }

    /// The underlying parser message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Convert 1-based line/column to byte offset
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut current_line = 1;
    let mut line_start = 0;

    if line > 1 {
        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                current_line += 1;
                if current_line == line {
                    line_start = i + 1;
                    break;
                }
            }
        }
        if current_line < line {
            return source.len().saturating_sub(1);
        }
    }

    let line_len = source[line_start..].find('\n').unwrap_or(source.len() - line_start);
    line_start + column.saturating_sub(1).min(line_len)
}

/// Generate helpful suggestions based on error message
fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("expected ','") || msg_lower.contains("expected comma") {
        return Some("Add commas between list items: [item1, item2, item3]".to_string());
    }

    if msg_lower.contains("tab") {
        return Some(
            "YAML requires spaces for indentation, not tabs. Replace tabs with spaces.".to_string(),
        );
    }

    if msg_lower.contains("duplicate key") {
        return Some("Each key can only appear once. Remove or rename the duplicate key.".to_string());
    }

    if msg_lower.contains("trailing comma") {
        return Some("JSON does not allow a comma after the last item.".to_string());
    }

    if msg_lower.contains("mapping values are not allowed") {
        return Some("You may be missing a space after ':' or have incorrect indentation.".to_string());
    }

    None
}
