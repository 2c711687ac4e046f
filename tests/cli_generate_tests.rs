//! End-to-end tests for `pagecraft generate` command.

mod fixtures;
use fixtures::*;

use pagecraft::models::{Page, Widget, WidgetKind};
use std::fs;

#[test]
fn test_generate_to_stdout() {
    let (layout_path, temp_dir) = create_temp_layout_file(&test_device_basic());

    let output = pagecraft(temp_dir.path())
        .args(["generate", "--layout", layout_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("switch (id(display_page)) {"));
    assert!(stdout.contains("// @widget id=\"w0\""));
    assert!(!stdout.contains("wifi:"), "Snippet must not carry connectivity sections");
}

#[test]
fn test_generate_to_file_matches_stdout() {
    let (layout_path, temp_dir) = create_temp_layout_file(&test_device_all_kinds());
    let out_path = temp_dir.path().join("out").join("display.yaml");

    let to_file = pagecraft(temp_dir.path())
        .args([
            "generate",
            "--layout",
            layout_path.to_str().unwrap(),
            "--out",
            out_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");
    assert_eq!(to_file.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&to_file.stdout).contains("3 pages"));

    let to_stdout = pagecraft(temp_dir.path())
        .args(["generate", "--layout", layout_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    let written = fs::read_to_string(&out_path).unwrap();
    assert_eq!(written, String::from_utf8_lossy(&to_stdout.stdout));
}

#[test]
fn test_generate_invalid_layout_exits_1() {
    let mut device = test_device_basic();
    device.pages.push(
        Page::new("p1", "Overflow", 1).with_widget(Widget::new("big", WidgetKind::Text, 790, 470, 50, 50)),
    );
    let (layout_path, temp_dir) = create_temp_layout_file(&device);

    let output = pagecraft(temp_dir.path())
        .args(["generate", "--layout", layout_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Out of Bounds"), "stderr: {stderr}");
}

#[test]
fn test_generate_missing_file_exits_2() {
    let temp_dir = tempfile::TempDir::new().unwrap();

    let output = pagecraft(temp_dir.path())
        .args(["generate", "--layout", "/nonexistent/layout.json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load layout"));
}

#[test]
fn test_generate_resolves_layouts_dir() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let layouts_dir = temp_dir.path().join("layouts");
    fs::create_dir_all(&layouts_dir).unwrap();
    write_layout_file(&test_device_basic(), &layouts_dir.join("kitchen.json")).unwrap();
    fs::write(
        temp_dir.path().join("config.toml"),
        format!("[paths]\nlayouts_dir = {:?}\n", layouts_dir.to_str().unwrap()),
    )
    .unwrap();

    let output = pagecraft(temp_dir.path())
        .args(["generate", "--layout", "kitchen.json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}
