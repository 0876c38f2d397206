//! Submission sinks - where a finished selection is handed off

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use serde::Serialize;
use std::io::Write;
use thiserror::Error;
use ulid::Ulid;

use crate::core::selection::SubmissionRecord;

/// Errors raised while handing off a submission
#[derive(Debug, Error, Diagnostic)]
pub enum SinkError {
    #[error("failed to write submission: {0}")]
    #[diagnostic(code(pcfg::sink::io))]
    Io(#[from] std::io::Error),

    #[error("failed to encode submission as JSON: {0}")]
    #[diagnostic(code(pcfg::sink::encode))]
    Json(#[from] serde_json::Error),

    #[error("failed to encode submission as YAML: {0}")]
    #[diagnostic(code(pcfg::sink::encode))]
    Yaml(#[from] serde_yml::Error),
}

/// Receives finished submissions
pub trait SubmissionSink {
    fn submit(&mut self, record: &SubmissionRecord) -> Result<(), SinkError>;
}

impl<S: SubmissionSink + ?Sized> SubmissionSink for &mut S {
    fn submit(&mut self, record: &SubmissionRecord) -> Result<(), SinkError> {
        (**self).submit(record)
    }
}

impl<S: SubmissionSink + ?Sized> SubmissionSink for Box<S> {
    fn submit(&mut self, record: &SubmissionRecord) -> Result<(), SinkError> {
        (**self).submit(record)
    }
}

/// Emits each submission as a structured `tracing` event
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl SubmissionSink for LogSink {
    fn submit(&mut self, record: &SubmissionRecord) -> Result<(), SinkError> {
        tracing::info!(
            target: "pcfg::submission",
            quantity = record.quantity,
            process_id = ?record.process_id.map(|id| id.get()),
            material_id = ?record.material_id.map(|id| id.get()),
            finish_id = ?record.finish_id.map(|id| id.get()),
            custom_material = ?record.custom_material,
            custom_finish = ?record.custom_finish,
            color = ?record.color,
            infill = ?record.infill,
            tolerance = ?record.tolerance,
            threads = record.threads,
            inserts = record.inserts,
            "properties submitted"
        );
        Ok(())
    }
}

/// Encoding used by [`WriterSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkFormat {
    /// One compact JSON document per line
    #[default]
    JsonLines,
    /// Indented JSON
    JsonPretty,
    /// One YAML document per submission
    Yaml,
}

/// A submission wrapped with its id and timestamp
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<'a> {
    pub id: String,
    pub submitted: DateTime<Utc>,
    pub properties: &'a SubmissionRecord,
}

impl<'a> Envelope<'a> {
    pub fn new(properties: &'a SubmissionRecord) -> Self {
        Self {
            id: format!("SUB-{}", Ulid::new()),
            submitted: Utc::now(),
            properties,
        }
    }
}

/// Writes every submission to an `io::Write` inside an [`Envelope`]
pub struct WriterSink<W: Write> {
    writer: W,
    format: SinkFormat,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, format: SinkFormat) -> Self {
        Self { writer, format }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SubmissionSink for WriterSink<W> {
    fn submit(&mut self, record: &SubmissionRecord) -> Result<(), SinkError> {
        let envelope = Envelope::new(record);
        match self.format {
            SinkFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, &envelope)?;
                writeln!(self.writer)?;
            }
            SinkFormat::JsonPretty => {
                serde_json::to_writer_pretty(&mut self.writer, &envelope)?;
                writeln!(self.writer)?;
            }
            SinkFormat::Yaml => {
                let yaml = serde_yml::to_string(&envelope)?;
                write!(self.writer, "---\n{}", yaml)?;
            }
        }
        self.writer.flush()?;
        tracing::debug!(id = %envelope.id, "submission written");
        Ok(())
    }
}

/// Keeps submissions in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub records: Vec<SubmissionRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent submission
    pub fn last(&self) -> Option<&SubmissionRecord> {
        self.records.last()
    }
}

impl SubmissionSink for MemorySink {
    fn submit(&mut self, record: &SubmissionRecord) -> Result<(), SinkError> {
        self.records.push(record.clone());
        Ok(())
    }
}
