//! Core module - catalog, selection engine, submission and configuration

pub mod catalog;
pub mod check;
pub mod config;
pub mod engine;
pub mod identity;
pub mod selection;
pub mod sink;
pub mod workspace;

pub use catalog::{Catalog, CatalogError, CatalogFormat};
pub use check::{CatalogIssue, Severity};
pub use config::{Config, SinkKind};
pub use engine::{Engine, OptionsView};
pub use identity::{FinishId, IdParseError, MaterialId, ProcessId, RecordKind};
pub use selection::{FieldUpdate, Selection, SubmissionRecord, ToleranceState};
pub use sink::{LogSink, MemorySink, SinkError, SinkFormat, SubmissionSink, WriterSink};
pub use workspace::{Workspace, WorkspaceError};
