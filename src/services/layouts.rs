//! Layout file I/O service.
//!
//! This module centralizes all layout file operations, providing a consistent
//! interface for loading and saving devices in their JSON exchange shape.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::Device;

/// Service for managing layout file I/O operations.
///
/// This service centralizes all layout file operations to ensure consistent
/// handling of file paths, error messages, and file system operations.
pub struct LayoutService;

impl LayoutService {
    /// Loads a device layout from a JSON file.
    ///
    /// The layout is not validated; callers decide whether an invalid layout
    /// is an error (`generate`) or something to report (`validate`).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use pagecraft::services::LayoutService;
    ///
    /// let device = LayoutService::load(Path::new("kitchen.json"))?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load(path: &Path) -> Result<Device> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse layout JSON in {}", path.display()))
    }

    /// Saves a device layout as pretty-printed JSON.
    ///
    /// This performs an atomic write using a temp file + rename pattern to ensure
    /// the file is never left in a corrupted state.
    pub fn save(device: &Device, path: &Path) -> Result<()> {
        let mut content =
            serde_json::to_string_pretty(device).context("Failed to serialize layout")?;
        content.push('\n');
        write_atomic(path, &content)
            .with_context(|| format!("Failed to save layout to {}", path.display()))
    }

    /// Resolves where an imported device should be written.
    ///
    /// An existing directory receives `<sanitized device id>.json`; any other
    /// path is used as given.
    #[must_use]
    pub fn output_path(target: &Path, device: &Device) -> PathBuf {
        if target.is_dir() {
            target.join(format!("{}.json", sanitize_filename(&device.id)))
        } else {
            target.to_path_buf()
        }
    }
}

/// Writes text to a file through a sibling temp file and rename.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write temp file {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to {}", path.display()))?;

    Ok(())
}

/// Sanitizes a device id for use as a filename.
///
/// Replaces problematic characters with underscores and converts to lowercase.
///
/// # Examples
///
/// ```
/// # use pagecraft::services::layouts::sanitize_filename;
/// assert_eq!(sanitize_filename("Living Room"), "living_room");
/// assert_eq!(sanitize_filename("floor/2:hall"), "floor_2_hall");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    name.replace(['/', '\\', ':', ' '], "_").to_lowercase()
}
