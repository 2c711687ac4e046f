//! Pagecraft Library
//!
//! This library provides the display layout model for 800x480 e-paper panels
//! and a bidirectional codec between layouts and ESPHome configuration
//! snippets, plus the file and configuration helpers used by the CLI.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod models;
pub mod services;
pub mod snippet;
