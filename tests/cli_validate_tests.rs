//! End-to-end tests for `pagecraft validate` command.

mod fixtures;
use fixtures::*;

use pagecraft::models::{Page, Widget, WidgetKind};

#[test]
fn test_validate_valid_layout() {
    let (layout_path, temp_dir) = create_temp_layout_file(&test_device_all_kinds());

    let output = pagecraft(temp_dir.path())
        .args(["validate", "--layout", layout_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "Valid layout should exit with code 0. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✓ Validation passed"));
    assert!(stdout.contains("Pages:   3"));
}

#[test]
fn test_validate_valid_layout_json() {
    let (layout_path, temp_dir) = create_temp_layout_file(&test_device_basic());

    let output = pagecraft(temp_dir.path())
        .args(["validate", "--layout", layout_path.to_str().unwrap(), "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let result: serde_json::Value =
        serde_json::from_str(&stdout).expect("Should parse JSON output");

    assert_eq!(result["valid"], true);
    assert_eq!(result["errors"].as_array().unwrap().len(), 0);
}

#[test]
fn test_validate_reports_every_violation() {
    let mut device = test_device_basic();
    device.pages[0].add_widget(Widget::new("w0", WidgetKind::Gauge, 790, 0, 50, 10));
    device.pages.push(Page::new("p0", "Copy", 5));
    let (layout_path, temp_dir) = create_temp_layout_file(&device);

    let output = pagecraft(temp_dir.path())
        .args(["validate", "--layout", layout_path.to_str().unwrap(), "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1), "Invalid layout should exit with code 1");

    let result: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should parse JSON output");
    assert_eq!(result["valid"], false);

    let kinds: Vec<&str> = result["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["kind"].as_str())
        .collect();
    for expected in [
        "out_of_bounds",
        "missing_data_point",
        "duplicate_identifier",
        "ordinal_mismatch",
    ] {
        assert!(kinds.contains(&expected), "missing {expected} in {kinds:?}");
    }
}

#[test]
fn test_validate_strict_fails_on_warnings() {
    let mut device = test_device_basic();
    device.pages[0].add_widget(
        Widget::new("label", WidgetKind::Text, 0, 100, 50, 20).with_data_point("sensor.unused"),
    );
    let (layout_path, temp_dir) = create_temp_layout_file(&device);

    let relaxed = pagecraft(temp_dir.path())
        .args(["validate", "--layout", layout_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");
    assert_eq!(relaxed.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&relaxed.stdout).contains("⚠"));

    let strict = pagecraft(temp_dir.path())
        .args(["validate", "--layout", layout_path.to_str().unwrap(), "--strict"])
        .output()
        .expect("Failed to execute command");
    assert_eq!(strict.status.code(), Some(1));
}

#[test]
fn test_validate_malformed_json_exits_2() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let output = pagecraft(temp_dir.path())
        .args(["validate", "--layout", path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_malformed_config_warns_and_uses_defaults() {
    let (layout_path, temp_dir) = create_temp_layout_file(&test_device_basic());
    std::fs::write(temp_dir.path().join("config.toml"), "[import\nstrict = true\n").unwrap();

    let output = pagecraft(temp_dir.path())
        .args(["validate", "--layout", layout_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("⚠ Ignoring configuration file"), "stderr: {stderr}");
    assert!(String::from_utf8_lossy(&output.stdout).contains("✓ Validation passed"));
}
