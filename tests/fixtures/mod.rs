//! Shared test fixtures for codec and E2E CLI tests.
#![allow(dead_code)] // Each test crate uses a different subset

use pagecraft::models::{Device, Page, RgbColor, Style, Widget, WidgetKind};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Single page with one temperature readout.
pub fn test_device_basic() -> Device {
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

/// Three pages covering every widget kind and style key.
pub fn test_device_all_kinds() -> Device {
    let mut device = Device::new("hallway", "Hallway Panel").unwrap();

    let overview = Page::new("overview", "Overview", 0)
        .with_widget(
            Widget::new("title", WidgetKind::Text, 20, 10, 400, 40).with_style(
                Style::new()
                    .with_text("Good morning")
                    .with_font_size(32)
                    .with_color(RgbColor::new(0, 0, 0)),
            ),
        )
        .with_widget(
            Widget::new("clock", WidgetKind::Clock, 600, 10, 180, 40)
                .with_style(Style::new().with_format("%H:%M:%S").with_font_size(28)),
        )
        .with_widget(
            Widget::new("outside", WidgetKind::Value, 20, 80, 200, 40)
                .with_data_point("sensor.outside_temperature")
                .with_style(Style::new().with_format("%.1f °C")),
        );

    let energy = Page::new("energy", "Energy", 1)
        .with_widget(
            Widget::new("battery", WidgetKind::Gauge, 20, 400, 760, 40)
                .with_data_point("sensor.home_battery")
                .with_style(Style::new().with_range(-20, 120).with_color(RgbColor::new(255, 0, 0))),
        )
        .with_widget(
            Widget::new("bolt", WidgetKind::Icon, 20, 20, 64, 64)
                .with_style(Style::new().with_icon("F0241").with_font_size(48)),
        )
        .with_widget(Widget::new("grid", WidgetKind::Value, 100, 20, 200, 40).with_data_point("sensor.grid-power.now"));

    let empty = Page::new("blank", "Blank", 2);

    device.add_page(overview).unwrap();
    device.add_page(energy).unwrap();
    device.add_page(empty).unwrap();
    device
}

/// Free text that collides with comment, string, brace and label syntax.
pub fn test_device_hostile_text() -> Device {
    let mut device = Device::new("dev\"9", "Kitchen \"main\" \\ display\nsecond line").unwrap();
    device
        .add_page(
            Page::new("p0", "*/ } case 9: { // \"quoted\"", 0)
                .with_widget(
                    Widget::new("label one", WidgetKind::Text, 0, 0, 300, 40)
                        .with_style(Style::new().with_text("line1\nline2\ttab \\ back */ }")),
                )
                .with_widget(
                    Widget::new("w-\"2\"", WidgetKind::Text, 0, 50, 300, 40)
                        .with_style(Style::new().with_text("case 1: { break; } default:")),
                ),
        )
        .unwrap();
    device
        .add_page(Page::new("p1", "\u{2028}separator\u{85}\u{7}", 1))
        .unwrap();
    device
}

/// One page with three text widgets (w0, w1, w2).
pub fn test_device_three_widgets() -> Device {
    let mut device = Device::new("dev3", "Three").unwrap();
    let mut page = Page::new("p0", "Main", 0);
    for (index, y) in [(0u32, 0u32), (1, 100), (2, 200)] {
        page.add_widget(
            Widget::new(format!("w{index}"), WidgetKind::Text, 10, y, 200, 50)
                .with_style(Style::new().with_text(format!("Label {index}"))),
        );
    }
    device.add_page(page).unwrap();
    device
}

/// Writes a device as layout JSON into a fresh temp directory.
pub fn create_temp_layout_file(device: &Device) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("layout.json");
    write_layout_file(device, &path).unwrap();
    (path, temp_dir)
}

/// Writes a device as layout JSON.
pub fn write_layout_file(device: &Device, path: &Path) -> std::io::Result<()> {
    let content = serde_json::to_string_pretty(device).unwrap();
    fs::write(path, content)
}

/// Writes snippet text into a fresh temp directory.
pub fn create_temp_snippet_file(text: &str) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("display.yaml");
    fs::write(&path, text).unwrap();
    (path, temp_dir)
}

/// Binary under test, isolated from the user's configuration.
pub fn pagecraft(config_dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_pagecraft"));
    command
        .env("PAGECRAFT_CONFIG", config_dir.join("config.toml"))
        .env_remove("RUST_LOG");
    command
}
