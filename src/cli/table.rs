//! Table formatting for CLI list commands
//!
//! Commands build a [`Table`] of plain string cells and render it in the
//! requested [`OutputFormat`]. JSON and YAML are handled by the commands
//! themselves since they serialize the records directly.

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::OutputFormat;

/// Configuration for table output
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Show summary line after table (e.g., "5 material(s) found")
    pub show_summary: bool,
    /// Noun used in the summary line
    pub noun: &'static str,
}

impl TableConfig {
    pub fn new(noun: &'static str) -> Self {
        Self {
            show_summary: true,
            noun,
        }
    }

    /// Create config optimized for piping (no summary)
    pub fn for_pipe(noun: &'static str) -> Self {
        Self {
            show_summary: false,
            noun,
        }
    }
}

/// A header row plus string cells; the first column is the record id
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the table as text in the given format
    pub fn render(&self, format: OutputFormat, config: &TableConfig) -> Result<String> {
        let mut out = match format {
            OutputFormat::Tsv => {
                let mut out = self.headers.join("\t").to_uppercase();
                out.push('\n');
                for row in &self.rows {
                    out.push_str(&row.join("\t"));
                    out.push('\n');
                }
                out
            }
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                writer.write_record(&self.headers).into_diagnostic()?;
                for row in &self.rows {
                    writer.write_record(row).into_diagnostic()?;
                }
                let bytes = writer
                    .into_inner()
                    .map_err(|e| miette::miette!("failed to write CSV: {}", e.error()))?;
                String::from_utf8(bytes).into_diagnostic()?
            }
            OutputFormat::Id => {
                let mut out = String::new();
                for row in &self.rows {
                    if let Some(id) = row.first() {
                        out.push_str(id);
                        out.push('\n');
                    }
                }
                out
            }
            OutputFormat::Md => self.build(true),
            OutputFormat::Auto | OutputFormat::Json | OutputFormat::Yaml => self.build(false),
        };

        let summary = config.show_summary
            && !matches!(format, OutputFormat::Csv | OutputFormat::Id | OutputFormat::Tsv);
        if summary {
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
            out.push_str(&format!(
                "{} {}(s) found",
                style(self.rows.len()).cyan(),
                config.noun
            ));
            out.push('\n');
        }

        Ok(out)
    }

    fn build(&self, markdown: bool) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.headers.iter().cloned());
        for row in &self.rows {
            builder.push_record(row.iter().cloned());
        }

        if markdown {
            builder.build().with(Style::markdown()).to_string()
        } else {
            builder.build().with(Style::rounded()).to_string()
        }
    }
}
