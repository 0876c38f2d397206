//! Catalog record types
//!
//! The catalog holds three record types, each static for a session:
//!
//! - [`Process`] - Manufacturing technologies, chosen first
//! - [`Material`] - Substances scoped to one process, with optional color,
//!   infill and tolerance choices
//! - [`Finish`] - Post-processing options scoped to one process and a subset
//!   of its materials

pub mod finish;
pub mod material;
pub mod process;

pub use finish::Finish;
pub use material::{Material, ToleranceSpec};
pub use process::Process;
