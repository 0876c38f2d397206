//! Schema system - embedded assets, catalog validation and syntax diagnostics

pub mod assets;
pub mod diagnostics;
pub mod validator;

pub use diagnostics::SyntaxError;
pub use validator::{CatalogValidator, ValidationError};
