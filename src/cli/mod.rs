//! CLI command handlers for Pagecraft.
//!
//! This module provides headless, scriptable access to the snippet codec
//! for automation, testing, and CI/CD integration.

pub mod common;
pub mod generate;
pub mod import;
pub mod validate;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use generate::GenerateArgs;
pub use import::ImportArgs;
pub use validate::ValidateArgs;
