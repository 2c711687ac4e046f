//! Widget data structures.

use crate::constants::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::models::{Style, StyleKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of visual element a widget draws.
///
/// This is a closed set; adding a kind means teaching the snippet grammar how
/// to draw and mark it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    /// Static text label
    Text,
    /// Live data point value
    Value,
    /// Icon glyph
    Icon,
    /// Horizontal bar gauge
    Gauge,
    /// Current time
    Clock,
}

impl WidgetKind {
    /// All widget kinds.
    pub const ALL: [Self; 5] = [Self::Text, Self::Value, Self::Icon, Self::Gauge, Self::Clock];

    /// Lowercase name used in the exchange shape and in snippet markers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Value => "value",
            Self::Icon => "icon",
            Self::Gauge => "gauge",
            Self::Clock => "clock",
        }
    }

    /// Style keys this kind may carry.
    #[must_use]
    pub const fn allowed_style_keys(self) -> &'static [StyleKey] {
        match self {
            Self::Text => &[StyleKey::Text, StyleKey::FontSize, StyleKey::Color],
            Self::Value | Self::Clock => &[StyleKey::Format, StyleKey::FontSize, StyleKey::Color],
            Self::Icon => &[StyleKey::Icon, StyleKey::FontSize, StyleKey::Color],
            Self::Gauge => &[StyleKey::Min, StyleKey::Max, StyleKey::Color],
        }
    }

    /// Returns true if the kind may carry the given style key.
    #[must_use]
    pub fn allows(self, key: StyleKey) -> bool {
        self.allowed_style_keys().contains(&key)
    }

    /// Returns true if the kind cannot render without a bound data point.
    #[must_use]
    pub const fn requires_data_point(self) -> bool {
        matches!(self, Self::Value | Self::Gauge)
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown widget kind '{s}'"))
    }
}

/// One positioned, styled visual element on a page.
///
/// # Validation
///
/// - ID must be non-empty and unique within the device
/// - Width and height must be at least 1
/// - `x + width` and `y + height` must fit the 800x480 canvas
/// - `value` and `gauge` widgets need a data point
/// - Style keys must be allowed for the kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    /// Stable identifier
    pub id: String,
    /// Visual element kind
    pub kind: WidgetKind,
    /// Bound data point (e.g. "sensor.temperature"), resolved elsewhere
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_point: Option<String>,
    /// Left edge in device pixels
    pub x: u32,
    /// Top edge in device pixels
    pub y: u32,
    /// Width in device pixels
    pub width: u32,
    /// Height in device pixels
    pub height: u32,
    /// Style and format settings
    #[serde(default)]
    pub style: Style,
}

impl Widget {
    /// Creates a widget with an empty style and no data point.
    pub fn new(id: impl Into<String>, kind: WidgetKind, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            kind,
            data_point: None,
            x,
            y,
            width,
            height,
            style: Style::default(),
        }
    }

    /// Binds the widget to a data point.
    pub fn with_data_point(mut self, data_point: impl Into<String>) -> Self {
        self.data_point = Some(data_point.into());
        self
    }

    /// Replaces the widget style.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Right edge (exclusive), saturating on overflow.
    #[must_use]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive), saturating on overflow.
    #[must_use]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Returns true if the widget lies entirely on the canvas.
    #[must_use]
    pub const fn fits_canvas(&self) -> bool {
        self.right() <= CANVAS_WIDTH && self.bottom() <= CANVAS_HEIGHT
    }

    /// Moves and shrinks the widget so that it fits the canvas.
    ///
    /// Editors call this after drag/resize; the codec never clamps on its own.
    pub fn clamp_to_canvas(&mut self) {
        self.width = self.width.clamp(1, CANVAS_WIDTH);
        self.height = self.height.clamp(1, CANVAS_HEIGHT);
        self.x = self.x.min(CANVAS_WIDTH - self.width);
        self.y = self.y.min(CANVAS_HEIGHT - self.height);
    }
}
