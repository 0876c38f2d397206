//! Workspace discovery and structure
//!
//! A workspace is any directory holding a `.pcfg/` folder. It carries a
//! `config.yaml` and, usually, the `catalog.yaml` the configurator runs on.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::schema::assets;

/// Name of the workspace marker directory
pub const WORKSPACE_DIR: &str = ".pcfg";

/// Represents a configurator workspace
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Root directory of the workspace (parent of .pcfg/)
    root: PathBuf,
}

impl Workspace {
    /// Find the workspace root by walking up from the current directory
    pub fn discover() -> Result<Self, WorkspaceError> {
        let current =
            std::env::current_dir().map_err(|e| WorkspaceError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find the workspace root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, WorkspaceError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;

        loop {
            if current.join(WORKSPACE_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(WorkspaceError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new workspace at the given path
    pub fn init(path: &Path) -> Result<Self, WorkspaceError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join(WORKSPACE_DIR).exists() {
            return Err(WorkspaceError::AlreadyExists(root));
        }

        Self::write_structure(root)
    }

    /// Initialize even if .pcfg/ exists, overwriting config and catalog
    pub fn init_force(path: &Path) -> Result<Self, WorkspaceError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::write_structure(root)
    }

    fn write_structure(root: PathBuf) -> Result<Self, WorkspaceError> {
        let workspace = Self { root };

        std::fs::create_dir_all(workspace.config_dir())
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;

        std::fs::write(workspace.config_path(), Self::default_config())
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;

        let catalog = assets::sample_catalog().ok_or_else(|| {
            WorkspaceError::IoError("built-in sample catalog is missing".to_string())
        })?;
        std::fs::write(workspace.catalog_path(), catalog)
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;

        Ok(workspace)
    }

    fn default_config() -> &'static str {
        r#"# Part configurator workspace configuration

# Catalog file (YAML or JSON). Relative paths are resolved from the
# workspace root. Defaults to .pcfg/catalog.yaml.
# catalog: ".pcfg/catalog.yaml"

# Default output format (auto, yaml, json, tsv, csv, md, id)
# default_format: auto

# Where submissions go: stdout (JSON document) or log (structured log event)
# sink: stdout
"#
    }

    /// Get the workspace root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .pcfg directory
    pub fn config_dir(&self) -> PathBuf {
        self.root.join(WORKSPACE_DIR)
    }

    /// Get the workspace config file path
    pub fn config_path(&self) -> PathBuf {
        self.config_dir().join("config.yaml")
    }

    /// Get the default catalog path
    pub fn catalog_path(&self) -> PathBuf {
        self.config_dir().join("catalog.yaml")
    }

    /// Resolve a path relative to the workspace root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

/// Errors that can occur during workspace operations
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("not a configurator workspace (searched from {searched_from:?}). Run 'pcfg init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("workspace already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
