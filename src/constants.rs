//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and the target display geometry.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "Pagecraft";

/// Width of the target display canvas in device pixels.
pub const CANVAS_WIDTH: u32 = 800;

/// Height of the target display canvas in device pixels.
pub const CANVAS_HEIGHT: u32 = 480;
