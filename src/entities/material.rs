//! Material entity type - Substances scoped to one process

use serde::{Deserialize, Serialize};

use crate::core::identity::{MaterialId, ProcessId};

/// Tolerance choices offered for a material
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToleranceSpec {
    /// Tolerance preselected when the material is chosen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<f64>,

    /// Tolerances the user may pick from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<f64>,
}

impl ToleranceSpec {
    /// Whether the default is one of the offered options (vacuously true without a default)
    pub fn default_is_offered(&self) -> bool {
        match self.default {
            Some(d) => self.options.is_empty() || self.options.iter().any(|o| *o == d),
            None => true,
        }
    }
}

/// A Material record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// Unique identifier
    pub id: MaterialId,

    /// Owning process (foreign key)
    pub process_id: ProcessId,

    /// Display name (e.g., "Aluminum 6061-T6")
    pub name: String,

    /// Available colors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub color: Vec<String>,

    /// Available infill densities (additive processes)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub infill: Vec<String>,

    /// Tolerance default and options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<ToleranceSpec>,

    /// Whether the material is currently offered
    #[serde(default = "default_active")]
    pub active: bool,

    /// Placeholder record that asks the user to describe the material
    #[serde(default)]
    pub is_custom: bool,
}

fn default_active() -> bool {
    true
}

impl Material {
    /// Create a new active, non-custom material with no option lists
    pub fn new(
        id: impl Into<MaterialId>,
        process_id: impl Into<ProcessId>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            process_id: process_id.into(),
            name: name.into(),
            color: Vec::new(),
            infill: Vec::new(),
            tolerance: None,
            active: true,
            is_custom: false,
        }
    }

    /// Whether this material may be picked while `process` is selected
    pub fn is_selectable_for(&self, process: ProcessId) -> bool {
        self.process_id == process && self.active
    }

    /// Default tolerance, if the material defines one
    pub fn default_tolerance(&self) -> Option<f64> {
        self.tolerance.as_ref().and_then(|t| t.default)
    }

    /// Offered tolerance values (empty when none)
    pub fn tolerance_options(&self) -> &[f64] {
        self.tolerance
            .as_ref()
            .map(|t| t.options.as_slice())
            .unwrap_or(&[])
    }
}
