//! Widget style bag with a closed key set.

use crate::models::RgbColor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest font size a widget may request.
pub const MIN_FONT_SIZE: u16 = 6;
/// Largest font size a widget may request.
pub const MAX_FONT_SIZE: u16 = 200;
/// Gauge lower bound when `min` is not set.
pub const DEFAULT_GAUGE_MIN: i32 = 0;
/// Gauge upper bound when `max` is not set.
pub const DEFAULT_GAUGE_MAX: i32 = 100;

/// Keys a widget style may carry.
///
/// The set is closed: the exchange shape rejects unknown keys, and which keys a
/// widget may use depends on its [`WidgetKind`](crate::models::WidgetKind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleKey {
    /// Literal label text
    Text,
    /// printf/strftime format string
    Format,
    /// Icon glyph (e.g. an MDI codepoint such as `F0594`)
    Icon,
    /// Font size in pixels
    FontSize,
    /// Foreground color
    Color,
    /// Gauge lower bound
    Min,
    /// Gauge upper bound
    Max,
}

impl StyleKey {
    /// All keys in canonical order.
    pub const ALL: [Self; 7] = [
        Self::Text,
        Self::Format,
        Self::Icon,
        Self::FontSize,
        Self::Color,
        Self::Min,
        Self::Max,
    ];

    /// Canonical snake_case name of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Format => "format",
            Self::Icon => "icon",
            Self::FontSize => "font_size",
            Self::Color => "color",
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

impl fmt::Display for StyleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown style key '{s}'"))
    }
}

/// Style and format settings of a widget.
///
/// All fields are optional; absent fields are omitted from the exchange shape.
/// Field names in the exchange shape are the [`StyleKey`] names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Style {
    /// Literal label text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// printf/strftime format string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Icon glyph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Font size in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u16>,
    /// Foreground color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<RgbColor>,
    /// Gauge lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i32>,
    /// Gauge upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
}

impl Style {
    /// Creates an empty style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the label text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the format string.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets the icon glyph.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Sets the font size.
    pub const fn with_font_size(mut self, size: u16) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Sets the foreground color.
    pub const fn with_color(mut self, color: RgbColor) -> Self {
        self.color = Some(color);
        self
    }

    /// Sets the gauge range.
    pub const fn with_range(mut self, min: i32, max: i32) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Returns true if the given key is set.
    #[must_use]
    pub const fn has(&self, key: StyleKey) -> bool {
        match key {
            StyleKey::Text => self.text.is_some(),
            StyleKey::Format => self.format.is_some(),
            StyleKey::Icon => self.icon.is_some(),
            StyleKey::FontSize => self.font_size.is_some(),
            StyleKey::Color => self.color.is_some(),
            StyleKey::Min => self.min.is_some(),
            StyleKey::Max => self.max.is_some(),
        }
    }

    /// Keys that are set, in canonical order.
    #[must_use]
    pub fn keys(&self) -> Vec<StyleKey> {
        StyleKey::ALL.into_iter().filter(|key| self.has(*key)).collect()
    }

    /// Returns true if no key is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }
}
