//! The static manufacturing catalog
//!
//! A catalog is three ordered lists - processes, materials and finishes -
//! loaded once and treated as read-only for the session. Documents are
//! accepted as YAML or JSON and checked against the embedded JSON Schema
//! before they are deserialized.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::identity::{FinishId, MaterialId, ProcessId, RecordKind};
use crate::entities::{Finish, Material, Process};
use crate::schema::{assets, CatalogValidator, SyntaxError, ValidationError};

/// On-disk catalog format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Yaml,
    Json,
}

impl CatalogFormat {
    /// Determine the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "yaml" | "yml" => Ok(CatalogFormat::Yaml),
            "json" => Ok(CatalogFormat::Json),
            _ => Err(CatalogError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Errors raised while loading a catalog
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("failed to read catalog {path:?}: {source}")]
    #[diagnostic(code(pcfg::catalog::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported catalog file {path:?}")]
    #[diagnostic(
        code(pcfg::catalog::format),
        help("Catalogs must be .yaml, .yml or .json files")
    )]
    UnsupportedFormat { path: PathBuf },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Schema(#[from] ValidationError),

    #[error("catalog does not match the expected record shapes: {0}")]
    #[diagnostic(code(pcfg::catalog::shape))]
    Shape(#[from] serde_json::Error),

    #[error("duplicate {kind} id {id} in {filename}")]
    #[diagnostic(
        code(pcfg::catalog::duplicate),
        help("Ids must be unique within each of processes, materials and finishes")
    )]
    DuplicateId {
        kind: RecordKind,
        id: u32,
        filename: String,
    },

    #[error("the built-in sample catalog is missing from this build")]
    #[diagnostic(code(pcfg::catalog::sample))]
    MissingSample,
}

/// The static set of processes, materials and finishes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub processes: Vec<Process>,

    #[serde(default)]
    pub materials: Vec<Material>,

    #[serde(default)]
    pub finishes: Vec<Finish>,
}

impl Catalog {
    /// Create a catalog from its three lists
    pub fn new(processes: Vec<Process>, materials: Vec<Material>, finishes: Vec<Finish>) -> Self {
        Self {
            processes,
            materials,
            finishes,
        }
    }

    /// Load and validate a catalog file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let format = CatalogFormat::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path.display().to_string();

        let catalog = Self::parse(&content, format, &filename)?;
        tracing::debug!(
            path = %path.display(),
            processes = catalog.processes.len(),
            materials = catalog.materials.len(),
            finishes = catalog.finishes.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Parse and validate catalog text
    pub fn parse(content: &str, format: CatalogFormat, filename: &str) -> Result<Self, CatalogError> {
        let document: JsonValue = match format {
            CatalogFormat::Yaml => {
                let yaml: serde_yml::Value = serde_yml::from_str(content)
                    .map_err(|e| SyntaxError::from_yaml_error(&e, content, filename))?;
                serde_json::to_value(yaml)?
            }
            CatalogFormat::Json => serde_json::from_str(content)
                .map_err(|e| SyntaxError::from_json_error(&e, content, filename))?,
        };

        CatalogValidator::new().validate(&document, content, filename)?;

        let catalog: Catalog = serde_json::from_value(document)?;
        if let Some((kind, id)) = catalog.first_duplicate() {
            return Err(CatalogError::DuplicateId {
                kind,
                id,
                filename: filename.to_string(),
            });
        }
        Ok(catalog)
    }

    /// The sample catalog embedded in the binary
    pub fn sample() -> Result<Self, CatalogError> {
        let content = assets::sample_catalog().ok_or(CatalogError::MissingSample)?;
        Self::parse(&content, CatalogFormat::Yaml, assets::SAMPLE_CATALOG)
    }

    /// Serialize the catalog as YAML
    pub fn to_yaml(&self) -> Result<String, serde_yml::Error> {
        serde_yml::to_string(self)
    }

    /// Look up a process by id
    pub fn process(&self, id: ProcessId) -> Option<&Process> {
        self.processes.iter().find(|p| p.id == id)
    }

    /// Look up a material by id
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    /// Look up a finish by id
    pub fn finish(&self, id: FinishId) -> Option<&Finish> {
        self.finishes.iter().find(|f| f.id == id)
    }

    /// Material at a position in the material list
    pub fn material_at(&self, index: usize) -> Option<&Material> {
        self.materials.get(index)
    }

    /// Finish at a position in the finish list
    pub fn finish_at(&self, index: usize) -> Option<&Finish> {
        self.finishes.get(index)
    }

    /// Processes offered to the user
    pub fn active_processes(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter().filter(|p| p.active)
    }

    /// Materials selectable under a process (matching and active), in catalog order
    pub fn materials_for(&self, process: ProcessId) -> impl Iterator<Item = &Material> {
        self.materials
            .iter()
            .filter(move |m| m.is_selectable_for(process))
    }

    /// Finishes offered for a process and material, in catalog order
    pub fn finishes_for(
        &self,
        process: ProcessId,
        material: Option<MaterialId>,
    ) -> impl Iterator<Item = &Finish> {
        self.finishes
            .iter()
            .filter(move |f| f.is_offered_for(process, material))
    }

    /// Total number of records across all lists
    pub fn len(&self) -> usize {
        self.processes.len() + self.materials.len() + self.finishes.len()
    }

    /// Whether the catalog has no records at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
