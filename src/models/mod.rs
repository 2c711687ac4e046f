//! Data models for display layouts: devices, pages, widgets, and styles.
//!
//! Models carry shape and invariants only. They are independent of the
//! snippet codec, file I/O, and any presentation layer.

pub mod device;
pub mod page;
pub mod rgb;
pub mod style;
pub mod validator;
pub mod widget;

// Re-export all model types
pub use device::Device;
pub use page::Page;
pub use rgb::RgbColor;
pub use style::{Style, StyleKey};
pub use validator::{ValidationError, ValidationErrorKind, ValidationReport, ValidationWarning};
pub use widget::{Widget, WidgetKind};
