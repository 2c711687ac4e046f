//! Layout validation.
//!
//! Validation runs at defined boundaries: before snippet generation, after
//! snippet import, and whenever a collaborator hands over an edited device.
//! It never stops at the first problem; every violation ends up in the report.

use crate::constants::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::models::style::{DEFAULT_GAUGE_MAX, DEFAULT_GAUGE_MIN, MAX_FONT_SIZE, MIN_FONT_SIZE};
use crate::models::{Device, Widget};
use std::collections::HashSet;

/// Validation result with specific errors and warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Violations that make the device unusable
    pub errors: Vec<ValidationError>,
    /// Non-critical warnings
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Creates a new empty validation report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Returns true if there are no errors (warnings are allowed).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Adds an error to the report.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Adds a warning to the report.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Returns true if any error has the given kind.
    #[must_use]
    pub fn has_error(&self, kind: ValidationErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    /// Formats the report as a user-friendly message.
    #[must_use]
    pub fn format_message(&self) -> String {
        let mut message = String::new();

        if !self.errors.is_empty() {
            message.push_str(&format!("{} validation errors:\n", self.errors.len()));
            for (idx, error) in self.errors.iter().enumerate() {
                message.push_str(&format!("  {}. {}\n", idx + 1, error));
            }
        }

        if !self.warnings.is_empty() {
            if !message.is_empty() {
                message.push('\n');
            }
            message.push_str(&format!("{} warnings:\n", self.warnings.len()));
            for (idx, warning) in self.warnings.iter().enumerate() {
                message.push_str(&format!("  {}. {}\n", idx + 1, warning));
            }
        }

        message
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Type of validation error
    pub kind: ValidationErrorKind,
    /// Ordinal of the page where the error occurred
    pub page: Option<u32>,
    /// ID of the widget where the error occurred
    pub widget: Option<String>,
    /// Human-readable error message
    pub message: String,
    /// Optional suggestion for fixing the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            page: None,
            widget: None,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Sets the page context.
    #[must_use]
    pub const fn with_page(mut self, ordinal: u32) -> Self {
        self.page = Some(ordinal);
        self
    }

    /// Sets the widget context.
    pub fn with_widget(mut self, id: impl Into<String>) -> Self {
        self.widget = Some(id.into());
        self
    }

    /// Sets a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.page, &self.widget) {
            (Some(page), Some(widget)) => {
                write!(f, "[Page {} / {}] {}: {}", page, widget, self.kind, self.message)?;
            }
            (Some(page), None) => write!(f, "[Page {}] {}: {}", page, self.kind, self.message)?,
            (None, Some(widget)) => write!(f, "[{}] {}: {}", widget, self.kind, self.message)?,
            (None, None) => write!(f, "{}: {}", self.kind, self.message)?,
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n    → {suggestion}")?;
        }

        Ok(())
    }
}

/// Types of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Device has no pages
    EmptyDevice,
    /// Device, page or widget ID is empty
    MissingIdentifier,
    /// Page ordinal does not match its position
    OrdinalMismatch,
    /// Page or widget ID used more than once
    DuplicateIdentifier,
    /// Widget extends past the canvas
    OutOfBounds,
    /// Widget has zero width or height
    ZeroSize,
    /// Widget kind needs a data point but has none
    MissingDataPoint,
    /// Data point reference contains characters that cannot be carried
    InvalidDataPoint,
    /// Style key not allowed for the widget kind
    StyleKeyNotAllowed,
    /// Style value outside its permitted range
    InvalidStyleValue,
}

impl ValidationErrorKind {
    /// Stable snake_case identifier for machine-readable output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyDevice => "empty_device",
            Self::MissingIdentifier => "missing_identifier",
            Self::OrdinalMismatch => "ordinal_mismatch",
            Self::DuplicateIdentifier => "duplicate_identifier",
            Self::OutOfBounds => "out_of_bounds",
            Self::ZeroSize => "zero_size",
            Self::MissingDataPoint => "missing_data_point",
            Self::InvalidDataPoint => "invalid_data_point",
            Self::StyleKeyNotAllowed => "style_key_not_allowed",
            Self::InvalidStyleValue => "invalid_style_value",
        }
    }
}

impl std::fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDevice => write!(f, "Empty Device"),
            Self::MissingIdentifier => write!(f, "Missing Identifier"),
            Self::OrdinalMismatch => write!(f, "Ordinal Mismatch"),
            Self::DuplicateIdentifier => write!(f, "Duplicate Identifier"),
            Self::OutOfBounds => write!(f, "Out of Bounds"),
            Self::ZeroSize => write!(f, "Zero Size"),
            Self::MissingDataPoint => write!(f, "Missing Data Point"),
            Self::InvalidDataPoint => write!(f, "Invalid Data Point"),
            Self::StyleKeyNotAllowed => write!(f, "Style Key Not Allowed"),
            Self::InvalidStyleValue => write!(f, "Invalid Style Value"),
        }
    }
}

/// Validation warning (non-blocking).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Warning message
    pub message: String,
}

impl ValidationWarning {
    /// Creates a new validation warning
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Validates a whole device.
#[must_use]
pub fn validate_device(device: &Device) -> ValidationReport {
    let mut report = ValidationReport::new();

    if device.id.trim().is_empty() {
        report.add_error(ValidationError::new(
            ValidationErrorKind::MissingIdentifier,
            "Device ID cannot be empty",
        ));
    }

    if device.pages.is_empty() {
        report.add_error(
            ValidationError::new(
                ValidationErrorKind::EmptyDevice,
                format!("Device '{}' has no pages", device.id),
            )
            .with_suggestion("Add at least one page"),
        );
        return report;
    }

    let mut page_ids = HashSet::new();
    let mut widget_ids = HashSet::new();

    for (index, page) in device.pages.iter().enumerate() {
        if usize::try_from(page.ordinal).ok() != Some(index) {
            report.add_error(
                ValidationError::new(
                    ValidationErrorKind::OrdinalMismatch,
                    format!("Page at index {} has ordinal {}", index, page.ordinal),
                )
                .with_page(page.ordinal)
                .with_suggestion("Renumber pages so ordinals run 0, 1, 2, ... in display order"),
            );
        }

        if page.id.trim().is_empty() {
            report.add_error(
                ValidationError::new(ValidationErrorKind::MissingIdentifier, "Page ID cannot be empty")
                    .with_page(page.ordinal),
            );
        } else if !page_ids.insert(page.id.as_str()) {
            report.add_error(
                ValidationError::new(
                    ValidationErrorKind::DuplicateIdentifier,
                    format!("Page ID '{}' appears multiple times", page.id),
                )
                .with_page(page.ordinal),
            );
        }

        for widget in &page.widgets {
            for error in validate_widget(widget) {
                report.add_error(error.with_page(page.ordinal));
            }

            if !widget.id.trim().is_empty() && !widget_ids.insert(widget.id.as_str()) {
                report.add_error(
                    ValidationError::new(
                        ValidationErrorKind::DuplicateIdentifier,
                        format!("Widget ID '{}' appears multiple times", widget.id),
                    )
                    .with_page(page.ordinal)
                    .with_widget(&widget.id),
                );
            }

            if widget.data_point.is_some() && !widget.kind.requires_data_point() {
                report.add_warning(ValidationWarning::new(format!(
                    "Widget '{}' ({}) has a data point that it does not display",
                    widget.id, widget.kind
                )));
            }
        }
    }

    report
}

/// Validates a single widget in isolation (no uniqueness checks).
#[must_use]
pub fn validate_widget(widget: &Widget) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let error = |kind, message: String| ValidationError::new(kind, message).with_widget(&widget.id);

    if widget.id.trim().is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingIdentifier,
            "Widget ID cannot be empty",
        ));
    }

    if widget.width == 0 || widget.height == 0 {
        errors.push(error(
            ValidationErrorKind::ZeroSize,
            format!("Size {}x{} must be at least 1x1", widget.width, widget.height),
        ));
    }

    if !widget.fits_canvas() {
        errors.push(
            error(
                ValidationErrorKind::OutOfBounds,
                format!(
                    "Widget at ({}, {}) with size {}x{} exceeds the {}x{} canvas",
                    widget.x, widget.y, widget.width, widget.height, CANVAS_WIDTH, CANVAS_HEIGHT
                ),
            )
            .with_suggestion("Move or shrink the widget"),
        );
    }

    match widget.data_point.as_deref() {
        None | Some("") if widget.kind.requires_data_point() => {
            errors.push(error(
                ValidationErrorKind::MissingDataPoint,
                format!("{} widgets need a data point", widget.kind),
            ));
        }
        Some(point) if point.chars().any(char::is_control) => {
            errors.push(error(
                ValidationErrorKind::InvalidDataPoint,
                format!("Data point {point:?} contains control characters"),
            ));
        }
        _ => {}
    }

    for key in widget.style.keys() {
        if !widget.kind.allows(key) {
            errors.push(error(
                ValidationErrorKind::StyleKeyNotAllowed,
                format!("Style key '{}' is not allowed for {} widgets", key, widget.kind),
            ));
        }
    }

    if let Some(size) = widget.style.font_size {
        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&size) {
            errors.push(error(
                ValidationErrorKind::InvalidStyleValue,
                format!("Font size {size} outside {MIN_FONT_SIZE}..={MAX_FONT_SIZE}"),
            ));
        }
    }

    if widget.style.min.is_some() || widget.style.max.is_some() {
        let min = widget.style.min.unwrap_or(DEFAULT_GAUGE_MIN);
        let max = widget.style.max.unwrap_or(DEFAULT_GAUGE_MAX);
        if min >= max {
            errors.push(error(
                ValidationErrorKind::InvalidStyleValue,
                format!("Gauge range {min}..{max} is empty"),
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Page, Style, WidgetKind};

    fn valid_device() -> Device {
        let mut device = Device::new("dev1", "Home").unwrap();
        device
            .add_page(
                Page::new("p0", "Home", 0).with_widget(
                    Widget::new("w0", WidgetKind::Value, 10, 10, 100, 30)
                        .with_data_point("sensor.temperature")
                        .with_style(Style::new().with_format("%.1f")),
                ),
            )
            .unwrap();
        device
    }

    #[test]
    fn test_valid_device() {
        let report = valid_device().validate();
        assert!(report.is_valid(), "{}", report.format_message());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_empty_device() {
        let device = Device::new("dev1", "Home").unwrap();
        let report = device.validate();
        assert!(report.has_error(ValidationErrorKind::EmptyDevice));
    }

    #[test]
    fn test_widget_exceeding_canvas() {
        let widget = Widget::new("w0", WidgetKind::Text, 790, 470, 50, 50);
        let errors = validate_widget(&widget);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::OutOfBounds);
    }

    #[test]
    fn test_ordinal_gap() {
        let mut device = valid_device();
        device.pages.push(Page::new("p2", "Gap", 2));
        assert!(device.validate().has_error(ValidationErrorKind::OrdinalMismatch));
    }

    #[test]
    fn test_duplicate_ids() {
        let mut device = valid_device();
        let mut page = Page::new("p0", "Copy", 1);
        page.add_widget(
            Widget::new("w0", WidgetKind::Value, 0, 0, 10, 10).with_data_point("sensor.x"),
        );
        device.add_page(page).unwrap();

        let report = device.validate();
        let duplicates = report
            .errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::DuplicateIdentifier)
            .count();
        assert_eq!(duplicates, 2);
    }

    #[test]
    fn test_style_key_not_allowed() {
        let widget = Widget::new("w0", WidgetKind::Gauge, 0, 0, 100, 10)
            .with_data_point("sensor.battery")
            .with_style(Style::new().with_text("nope").with_range(0, 100));
        let errors = validate_widget(&widget);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::StyleKeyNotAllowed);
    }

    #[test]
    fn test_missing_data_point_and_bad_range() {
        let widget = Widget::new("w0", WidgetKind::Gauge, 0, 0, 100, 10)
            .with_style(Style::new().with_range(50, 50));
        let kinds: Vec<_> = validate_widget(&widget).into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ValidationErrorKind::MissingDataPoint, ValidationErrorKind::InvalidStyleValue]
        );
    }

    #[test]
    fn test_gauge_range_uses_defaults() {
        let widget = Widget::new("w0", WidgetKind::Gauge, 0, 0, 100, 10)
            .with_data_point("sensor.battery")
            .with_style(Style { min: Some(100), ..Style::default() });
        assert_eq!(validate_widget(&widget)[0].kind, ValidationErrorKind::InvalidStyleValue);

        let widget = widget.with_style(Style { max: Some(5), ..Style::default() });
        assert!(validate_widget(&widget).is_empty());
    }

    #[test]
    fn test_font_size_range() {
        let widget = Widget::new("w0", WidgetKind::Text, 0, 0, 10, 10)
            .with_style(Style::new().with_font_size(2));
        assert_eq!(validate_widget(&widget)[0].kind, ValidationErrorKind::InvalidStyleValue);
    }

    #[test]
    fn test_unused_data_point_is_warning() {
        let mut device = valid_device();
        device.pages[0].add_widget(
            Widget::new("label", WidgetKind::Text, 0, 100, 50, 20).with_data_point("sensor.x"),
        );
        let report = device.validate();
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_report_format() {
        let mut report = ValidationReport::new();
        report.add_error(
            ValidationError::new(ValidationErrorKind::OutOfBounds, "Test error")
                .with_page(0)
                .with_widget("w0")
                .with_suggestion("Move it"),
        );
        report.add_warning(ValidationWarning::new("Test warning"));

        let message = report.format_message();
        assert!(message.contains("1 validation errors"));
        assert!(message.contains("[Page 0 / w0] Out of Bounds: Test error"));
        assert!(message.contains("1 warnings"));
        assert!(message.contains("Test warning"));
    }
}
