//! CLI command implementations

pub mod catalog;
pub mod completions;
pub mod config;
pub mod configure;
pub mod init;
pub mod options;
pub mod submit;
