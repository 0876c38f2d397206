//! Finish entity type - Post-processing options restricted to a set of materials

use serde::{Deserialize, Serialize};

use crate::core::identity::{FinishId, MaterialId, ProcessId};

/// A Finish record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finish {
    /// Unique identifier
    pub id: FinishId,

    /// Owning process (foreign key)
    pub process_id: ProcessId,

    /// Display name (e.g., "Anodized Type II")
    pub name: String,

    /// Materials this finish can be applied to
    #[serde(default)]
    pub restricted_materials: Vec<MaterialId>,

    /// Placeholder record that asks the user to describe the finish
    #[serde(default)]
    pub is_custom: bool,
}

impl Finish {
    /// Create a new non-custom finish
    pub fn new(
        id: impl Into<FinishId>,
        process_id: impl Into<ProcessId>,
        name: impl Into<String>,
        restricted_materials: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self {
            id: id.into(),
            process_id: process_id.into(),
            name: name.into(),
            restricted_materials: restricted_materials.into_iter().map(MaterialId).collect(),
            is_custom: false,
        }
    }

    /// Whether this finish is offered for the given process and material
    pub fn is_offered_for(&self, process: ProcessId, material: Option<MaterialId>) -> bool {
        self.process_id == process
            && material.is_some_and(|m| self.restricted_materials.contains(&m))
    }
}
