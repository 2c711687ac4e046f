//! Device (layout root) data structures.

use crate::models::validator::{self, ValidationReport};
use crate::models::{Page, Widget};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Root layout container: one display with an ordered set of pages.
///
/// # Validation
///
/// - ID must be non-empty
/// - At least one page required
/// - Page ordinals are contiguous from 0 and match list order
/// - Page IDs and widget IDs are unique within the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Stable device identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Pages in display order
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl Device {
    /// Creates a device without pages.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is empty.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let id = id.into();
        Self::validate_id(&id)?;

        Ok(Self {
            id,
            name: name.into(),
            pages: Vec::new(),
        })
    }

    fn validate_id(id: &str) -> Result<()> {
        if id.trim().is_empty() {
            anyhow::bail!("Device ID cannot be empty");
        }
        Ok(())
    }

    /// Appends a page.
    ///
    /// # Errors
    ///
    /// Returns an error if the page ordinal is not the next in sequence.
    pub fn add_page(&mut self, page: Page) -> Result<()> {
        let expected = u32::try_from(self.pages.len())?;
        if page.ordinal != expected {
            anyhow::bail!(
                "Page ordinals must be sequential. Expected page {}, got {}",
                expected,
                page.ordinal
            );
        }

        self.pages.push(page);
        Ok(())
    }

    /// Gets a page by ordinal.
    #[must_use]
    pub fn get_page(&self, ordinal: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.ordinal == ordinal)
    }

    /// Gets a mutable page by ordinal.
    pub fn get_page_mut(&mut self, ordinal: u32) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.ordinal == ordinal)
    }

    /// Removes a page and renumbers the remaining ones.
    pub fn remove_page(&mut self, ordinal: u32) -> Option<Page> {
        let index = self.pages.iter().position(|p| p.ordinal == ordinal)?;
        let removed = self.pages.remove(index);
        self.renumber_pages();
        Some(removed)
    }

    /// Moves a page to a new position and renumbers all pages.
    ///
    /// # Errors
    ///
    /// Returns an error if either position is out of range.
    pub fn move_page(&mut self, from: usize, to: usize) -> Result<()> {
        if from >= self.pages.len() || to >= self.pages.len() {
            anyhow::bail!(
                "Page move {} -> {} out of range (device has {} pages)",
                from,
                to,
                self.pages.len()
            );
        }

        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        self.renumber_pages();
        Ok(())
    }

    /// Sets every page ordinal to its list index.
    pub fn renumber_pages(&mut self) {
        for (ordinal, page) in (0u32..).zip(self.pages.iter_mut()) {
            page.ordinal = ordinal;
        }
    }

    /// Iterates over all widgets in page order.
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.pages.iter().flat_map(|p| p.widgets.iter())
    }

    /// Total number of widgets across pages.
    #[must_use]
    pub fn widget_count(&self) -> usize {
        self.widgets().count()
    }

    /// Validates the device structure and collects every violation.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        validator::validate_device(self)
    }

    /// Validates and converts a failing report into an error.
    ///
    /// # Errors
    ///
    /// Returns an error listing all violations if the device is invalid.
    pub fn ensure_valid(&self) -> Result<()> {
        let report = self.validate();
        if !report.is_valid() {
            anyhow::bail!("Device '{}' is invalid:\n{}", self.id, report.format_message());
        }
        Ok(())
    }
}
