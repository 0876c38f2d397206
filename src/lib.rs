//! pcfg: Part Configurator
//!
//! Cascading process → material → finish selection over a static
//! manufacturing catalog, with a CLI front end.

pub mod cli;
pub mod core;
pub mod entities;
pub mod schema;
