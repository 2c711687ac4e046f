//! Snippet generation: renders a [`Device`] as an ESPHome YAML fragment.
//!
//! Output is a pure function of the device. The same device always yields
//! byte-identical text, and [`parse_snippet`](super::parse_snippet) reads it
//! back into an equal device.

use crate::constants::APP_NAME;
use crate::models::Device;
use crate::snippet::error::SnippetError;
use crate::snippet::grammar::{
    self, DISPLAY_ID, DISPLAY_MODEL, DISPLAY_PLATFORM, DISPLAY_SECTION, GLOBALS_SECTION,
    LAMBDA_INDENT, LAMBDA_KEY, LAMBDA_STEP, PAGE_GLOBAL_ID,
};
use tracing::debug;

/// Generates the display snippet for a device.
///
/// The fragment holds a banner, the page global and a single display entry.
/// Connectivity sections (wifi, api, ota, ...) are never emitted.
///
/// # Errors
///
/// Returns [`SnippetError::InvalidLayout`] if the device fails validation.
pub fn generate_snippet(device: &Device) -> Result<String, SnippetError> {
    let report = device.validate();
    if !report.is_valid() {
        return Err(SnippetError::InvalidLayout(report));
    }

    let mut out = String::new();
    write_banner(&mut out, device);
    write_globals(&mut out);
    write_display(&mut out, device);

    debug!(
        device = %device.id,
        pages = device.pages.len(),
        widgets = device.widget_count(),
        bytes = out.len(),
        "generated display snippet"
    );
    Ok(out)
}

fn push_line(out: &mut String, indent: usize, text: &str) {
    out.push_str(&" ".repeat(indent));
    out.push_str(text);
    out.push('\n');
}

fn write_banner(out: &mut String, device: &Device) {
    push_line(
        out,
        0,
        &format!(
            "# {APP_NAME} display snippet for \"{}\" ({})",
            grammar::escape(&device.name),
            grammar::escape(&device.id)
        ),
    );
    push_line(out, 0, "# Merge into the device configuration next to its wifi/api sections.");
    push_line(
        out,
        0,
        &format!("# Set id({PAGE_GLOBAL_ID}) from a button or script to change pages."),
    );
    push_line(out, 0, "");
}

fn write_globals(out: &mut String) {
    push_line(out, 0, &format!("{GLOBALS_SECTION}:"));
    push_line(out, 2, &format!("- id: {PAGE_GLOBAL_ID}"));
    push_line(out, 4, "type: int");
    push_line(out, 4, "restore_value: true");
    push_line(out, 4, "initial_value: \"0\"");
    push_line(out, 0, "");
}

fn write_display(out: &mut String, device: &Device) {
    push_line(out, 0, &format!("{DISPLAY_SECTION}:"));
    push_line(out, 2, &format!("- platform: {DISPLAY_PLATFORM}"));
    push_line(out, 4, &format!("id: {DISPLAY_ID}"));
    push_line(out, 4, &format!("model: {DISPLAY_MODEL}"));
    push_line(out, 4, "update_interval: never");
    push_line(out, 4, &format!("{LAMBDA_KEY}: |-"));

    let base = LAMBDA_INDENT;
    let branch = base + LAMBDA_STEP;
    let body = branch + LAMBDA_STEP;

    push_line(out, base, &grammar::device_marker(device));
    push_line(out, base, &grammar::dispatch_open());
    for page in &device.pages {
        push_line(out, branch, &grammar::branch_open(page.ordinal));
        push_line(out, body, &grammar::page_marker(page));
        for widget in &page.widgets {
            push_line(out, body, &grammar::widget_marker(widget));
            for call in grammar::draw_calls(widget) {
                push_line(out, body, &call);
            }
        }
        push_line(out, body, "break;");
        push_line(out, branch, "}");
    }
    push_line(out, base, "}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Page, Style, Widget, WidgetKind};

    fn sample_device() -> Device {
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
    fn test_generates_expected_fragment() {
        let snippet = generate_snippet(&sample_device()).unwrap();
        let expected = r#"# Pagecraft display snippet for "Home" (dev1)
# Merge into the device configuration next to its wifi/api sections.
# Set id(display_page) from a button or script to change pages.

globals:
  - id: display_page
    type: int
    restore_value: true
    initial_value: "0"

display:
  - platform: waveshare_epaper
    id: epaper_display
    model: 7.50inv2
    update_interval: never
    lambda: |-
      // @device id="dev1" name="Home"
      switch (id(display_page)) {
        case 0: {
          // @page id="p0" title="Home"
          // @widget id="w0" kind=value data_point="sensor.temperature" x=10 y=10 width=100 height=30 format="%.1f"
          it.printf(10, 10, id(font_20), COLOR_ON, "%.1f", id(sensor_temperature).state);
          break;
        }
      }
"#;
        assert_eq!(snippet, expected);
    }

    #[test]
    fn test_output_is_valid_yaml() {
        let snippet = generate_snippet(&sample_device()).unwrap();
        let value: serde_yml::Value = serde_yml::from_str(&snippet).unwrap();
        let lambda = value["display"][0]["lambda"].as_str().unwrap();
        assert!(lambda.starts_with("// @device"));
        assert!(lambda.ends_with('}'));
        assert!(value.get("wifi").is_none());
    }

    #[test]
    fn test_invalid_device_is_rejected() {
        let device = Device::new("dev1", "Empty").unwrap();
        let err = generate_snippet(&device).unwrap_err();
        assert_eq!(err.code(), "invalid_layout");
    }

    #[test]
    fn test_banner_cannot_break_out() {
        let mut device = sample_device();
        device.name = "Evil\ndisplay: []".to_string();
        let snippet = generate_snippet(&device).unwrap();
        assert!(snippet.lines().next().unwrap().contains("Evil\\ndisplay: []"));
        let value: serde_yml::Value = serde_yml::from_str(&snippet).unwrap();
        assert!(value["display"].is_sequence());
    }
}
