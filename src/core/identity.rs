//! Catalog record identity - numeric ids scoped by record kind

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Catalog record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Manufacturing process (technology)
    Process,
    /// Material offered by one process
    Material,
    /// Post-processing finish
    Finish,
}

impl RecordKind {
    /// Get the string representation of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Process => "process",
            RecordKind::Material => "material",
            RecordKind::Finish => "finish",
        }
    }

    /// Name of the catalog list holding records of this kind
    pub fn list_name(&self) -> &'static str {
        match self {
            RecordKind::Process => "processes",
            RecordKind::Material => "materials",
            RecordKind::Finish => "finishes",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "process" | "processes" | "proc" => Ok(RecordKind::Process),
            "material" | "materials" | "mat" => Ok(RecordKind::Material),
            "finish" | "finishes" | "fin" => Ok(RecordKind::Finish),
            _ => Err(IdParseError::UnknownKind(s.to_string())),
        }
    }
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Record kind this id addresses
            pub const KIND: RecordKind = $kind;

            /// Raw numeric value
            pub fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<u32>()
                    .map($name)
                    .map_err(|_| IdParseError::InvalidNumber {
                        kind: Self::KIND,
                        value: s.to_string(),
                    })
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                $name(raw)
            }
        }
    };
}

record_id!(
    /// Identifier of a [`Process`](crate::entities::Process)
    ProcessId,
    RecordKind::Process
);
record_id!(
    /// Identifier of a [`Material`](crate::entities::Material)
    MaterialId,
    RecordKind::Material
);
record_id!(
    /// Identifier of a [`Finish`](crate::entities::Finish)
    FinishId,
    RecordKind::Finish
);

/// Errors when parsing record ids or kinds from user input
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdParseError {
    #[error("invalid {kind} id '{value}': expected a non-negative integer")]
    InvalidNumber { kind: RecordKind, value: String },

    #[error("unknown record kind '{0}'. Use process, material, or finish")]
    UnknownKind(String),
}
