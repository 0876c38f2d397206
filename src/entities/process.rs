//! Process entity type - Manufacturing technology offered by the catalog

use serde::{Deserialize, Serialize};

use crate::core::identity::ProcessId;

/// A Process record - a manufacturing technology selectable first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    /// Unique identifier
    pub id: ProcessId,

    /// Display name (e.g., "CNC Machining")
    pub name: String,

    /// Whether the process is currently offered
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Process {
    /// Create a new active process
    pub fn new(id: impl Into<ProcessId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            active: true,
        }
    }

    /// Mark the process as inactive (builder style)
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_creation() {
        let proc = Process::new(1, "CNC Machining");
        assert_eq!(proc.id, ProcessId(1));
        assert_eq!(proc.name, "CNC Machining");
        assert!(proc.active);
        assert!(!proc.inactive().active);
    }

    #[test]
    fn test_active_defaults_to_true() {
        let proc: Process = serde_yml::from_str("id: 2\nname: Sheet Metal\n").unwrap();
        assert!(proc.active);
    }
}
