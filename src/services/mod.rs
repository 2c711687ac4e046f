//! Service layer for file handling.
//!
//! This module contains services that coordinate between the models, the
//! snippet codec, and the file system.

pub mod layouts;

// Re-export commonly used types and functions
pub use layouts::{write_atomic, LayoutService};
