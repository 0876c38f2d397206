//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::workspace::Workspace;

/// Where `submit` and `configure` hand finished selections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkKind {
    /// Print an enveloped document on stdout
    #[default]
    Stdout,
    /// Emit a structured log event
    Log,
}

impl std::str::FromStr for SinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stdout" => Ok(SinkKind::Stdout),
            "log" => Ok(SinkKind::Log),
            _ => Err(format!("Invalid sink: {}. Use stdout or log", s)),
        }
    }
}

/// Configurator configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog file to load
    pub catalog: Option<PathBuf>,

    /// Default output format
    pub default_format: Option<String>,

    /// Submission sink (stdout or log)
    pub sink: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let workspace = Workspace::discover().ok();
        let mut config =
            Self::load_layers(Self::global_config_path().as_deref(), workspace.as_ref());

        // Environment variables
        if let Ok(catalog) = std::env::var("PCFG_CATALOG") {
            config.catalog = Some(PathBuf::from(catalog));
        }
        if let Ok(format) = std::env::var("PCFG_FORMAT") {
            config.default_format = Some(format);
        }
        if let Ok(sink) = std::env::var("PCFG_SINK") {
            config.sink = Some(sink);
        }

        config
    }

    /// Merge the file layers: built-in defaults, global config, workspace config
    pub fn load_layers(global_path: Option<&Path>, workspace: Option<&Workspace>) -> Self {
        // 1. Built-in defaults (already in Default impl)
        let mut config = Config::default();

        // 2. Global user config (~/.config/pcfg/config.yaml)
        if let Some(global) = global_path.and_then(Self::read_file) {
            config.merge(global);
        }

        // 3. Workspace config (.pcfg/config.yaml), falling back to its catalog
        if let Some(workspace) = workspace {
            if let Some(mut local) = Self::read_file(&workspace.config_path()) {
                local.catalog = local.catalog.map(|p| workspace.resolve(&p));
                config.merge(local);
            }
            if config.catalog.is_none() && workspace.catalog_path().exists() {
                config.catalog = Some(workspace.catalog_path());
            }
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        // A file holding only comments is an empty document
        match serde_yml::from_str::<Option<Config>>(&contents) {
            Ok(config) => Some(config.unwrap_or_default()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                None
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "pcfg")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.catalog.is_some() {
            self.catalog = other.catalog;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.sink.is_some() {
            self.sink = other.sink;
        }
    }

    /// Configured sink, defaulting to stdout for unknown values
    pub fn sink_kind(&self) -> SinkKind {
        match self.sink.as_deref().map(str::parse::<SinkKind>) {
            Some(Ok(kind)) => kind,
            Some(Err(e)) => {
                tracing::warn!("{}", e);
                SinkKind::default()
            }
            None => SinkKind::default(),
        }
    }

    /// Look up a key by name for `pcfg config show <key>`
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "catalog" => self.catalog.as_ref().map(|p| p.display().to_string()),
            "default_format" => self.default_format.clone(),
            "sink" => self.sink.clone(),
            _ => None,
        }
    }
}

/// Valid configuration keys with descriptions
pub const CONFIG_KEYS: &[(&str, &str)] = &[
    ("catalog", "Catalog file to load (YAML or JSON)"),
    (
        "default_format",
        "Default output format (yaml, json, tsv, etc.)",
    ),
    ("sink", "Where submissions go: stdout or log"),
];
