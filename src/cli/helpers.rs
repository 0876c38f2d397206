//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use miette::Result;
use std::io;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Catalog, Config, LogSink, SinkFormat, SinkKind, SubmissionSink, WriterSink};

/// Load the catalog for this invocation
///
/// Priority: `--catalog` flag, then configuration (env, workspace, global),
/// then the built-in sample.
pub fn load_catalog(global: &GlobalOpts, config: &Config) -> Result<Catalog> {
    let path = global.catalog.as_ref().or(config.catalog.as_ref());

    let catalog = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading catalog");
            Catalog::load(path)?
        }
        None => {
            tracing::debug!("no catalog configured, using built-in sample");
            Catalog::sample()?
        }
    };

    tracing::debug!(records = catalog.len(), "catalog ready");
    Ok(catalog)
}

/// Resolve the output format: explicit flag, then config default, then `fallback`
pub fn resolve_format(global: &GlobalOpts, config: &Config, fallback: OutputFormat) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }

    match config
        .default_format
        .as_deref()
        .map(str::parse::<OutputFormat>)
    {
        Some(Ok(OutputFormat::Auto)) | None => fallback,
        Some(Ok(format)) => format,
        Some(Err(e)) => {
            tracing::warn!(error = %e, "ignoring invalid default_format");
            fallback
        }
    }
}

/// Build the configured submission sink
///
/// Stdout submissions follow the output format: `yaml` writes YAML documents,
/// `json` writes indented JSON, anything else writes one JSON object per line.
pub fn open_sink(format: OutputFormat, config: &Config) -> Box<dyn SubmissionSink> {
    match config.sink_kind() {
        SinkKind::Log => Box::new(LogSink),
        SinkKind::Stdout => Box::new(WriterSink::new(io::stdout(), sink_format(format))),
    }
}

fn sink_format(format: OutputFormat) -> SinkFormat {
    match format {
        OutputFormat::Yaml => SinkFormat::Yaml,
        OutputFormat::Json => SinkFormat::JsonPretty,
        _ => SinkFormat::JsonLines,
    }
}

/// Format a tolerance value for display (e.g. "±0.05")
pub fn format_tolerance(value: f64) -> String {
    format!("±{}", value)
}

/// Join a list for a single table cell, "-" when empty
pub fn format_list<T: ToString>(items: &[T]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Render a yes/no cell
pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
