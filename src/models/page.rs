//! Page data structures.

use crate::models::Widget;
use serde::{Deserialize, Serialize};

/// One screen of widgets.
///
/// # Validation
///
/// - ID must be non-empty and unique within the device
/// - Ordinal must equal the page's index in the parent device
/// - A page without widgets is valid and renders empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Stable identifier
    pub id: String,
    /// Human-readable title
    pub title: String,
    /// Display position among sibling pages (0-based)
    pub ordinal: u32,
    /// Widgets in draw order
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

impl Page {
    /// Creates an empty page.
    pub fn new(id: impl Into<String>, title: impl Into<String>, ordinal: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ordinal,
            widgets: Vec::new(),
        }
    }

    /// Appends a widget (drawn after existing ones).
    pub fn add_widget(&mut self, widget: Widget) {
        self.widgets.push(widget);
    }

    /// Builder form of [`Page::add_widget`].
    pub fn with_widget(mut self, widget: Widget) -> Self {
        self.widgets.push(widget);
        self
    }

    /// Gets a widget by ID.
    #[must_use]
    pub fn get_widget(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    /// Removes a widget by ID.
    pub fn remove_widget(&mut self, id: &str) -> Option<Widget> {
        let index = self.widgets.iter().position(|w| w.id == id)?;
        Some(self.widgets.remove(index))
    }
}
