//! End-to-end tests for `pagecraft import` command.

mod fixtures;
use fixtures::*;

use pagecraft::models::Device;
use pagecraft::snippet::generate_snippet;
use std::fs;

#[test]
fn test_import_to_stdout() {
    let device = test_device_all_kinds();
    let (snippet_path, temp_dir) = create_temp_snippet_file(&generate_snippet(&device).unwrap());

    let output = pagecraft(temp_dir.path())
        .args([
            "import",
            "--snippet",
            snippet_path.to_str().unwrap(),
            "--device-id",
            "hallway",
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let imported: Device = serde_json::from_slice(&output.stdout).expect("Should print device JSON");
    assert_eq!(imported, device);
}

#[test]
fn test_import_to_directory() {
    let device = test_device_basic();
    let (snippet_path, temp_dir) = create_temp_snippet_file(&generate_snippet(&device).unwrap());
    let out_dir = temp_dir.path().join("layouts");
    fs::create_dir_all(&out_dir).unwrap();

    let output = pagecraft(temp_dir.path())
        .args([
            "import",
            "--snippet",
            snippet_path.to_str().unwrap(),
            "--device-id",
            "dev1",
            "--out",
            out_dir.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let saved: Device =
        serde_json::from_str(&fs::read_to_string(out_dir.join("dev1.json")).unwrap()).unwrap();
    assert_eq!(saved, device);
}

#[test]
fn test_import_json_reports_warnings() {
    let snippet = format!(
        "wifi:\n  ssid: !secret wifi_ssid\n{}",
        generate_snippet(&test_device_basic()).unwrap()
    );
    let (snippet_path, temp_dir) = create_temp_snippet_file(&snippet);

    let output = pagecraft(temp_dir.path())
        .args([
            "import",
            "--snippet",
            snippet_path.to_str().unwrap(),
            "--device-id",
            "dev1",
            "--json",
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["device"]["id"], "dev1");
    assert_eq!(result["warnings"].as_array().unwrap().len(), 1);
    assert!(result["warnings"][0]["message"].as_str().unwrap().contains("wifi"));
}

#[test]
fn test_import_strict_fails_on_warnings() {
    let snippet = generate_snippet(&test_device_basic())
        .unwrap()
        .replace("kind=value", "kind=slider");
    let (snippet_path, temp_dir) = create_temp_snippet_file(&snippet);
    let out_path = temp_dir.path().join("dev1.json");

    let output = pagecraft(temp_dir.path())
        .args([
            "import",
            "--snippet",
            snippet_path.to_str().unwrap(),
            "--device-id",
            "dev1",
            "--out",
            out_path.to_str().unwrap(),
            "--strict",
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(!out_path.exists(), "Strict failure must not write a layout");
    assert!(String::from_utf8_lossy(&output.stderr).contains("slider"));
}

#[test]
fn test_import_classified_errors_exit_1() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    for (text, code) in [
        ("display: [", "invalid_yaml"),
        ("sensor:\n  - platform: template\n", "unrecognized_display_structure"),
        (
            "display:\n  - lambda: |-\n      switch (id(display_page)) { default: break; }\n",
            "no_pages_found",
        ),
    ] {
        let path = temp_dir.path().join("snippet.yaml");
        fs::write(&path, text).unwrap();

        let output = pagecraft(temp_dir.path())
            .args(["import", "--snippet", path.to_str().unwrap(), "--device-id", "dev1"])
            .output()
            .expect("Failed to execute command");

        assert_eq!(output.status.code(), Some(1), "{code}");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains(code), "expected {code} in: {stderr}");
    }
}

#[test]
fn test_import_device_id_from_config() {
    let (snippet_path, temp_dir) =
        create_temp_snippet_file(&generate_snippet(&test_device_basic()).unwrap());
    fs::write(
        temp_dir.path().join("config.toml"),
        "[import]\ndevice_id = \"from-config\"\n",
    )
    .unwrap();

    let output = pagecraft(temp_dir.path())
        .args(["import", "--snippet", snippet_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let imported: Device = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(imported.id, "from-config");
}

#[test]
fn test_import_without_device_id_exits_1() {
    let (snippet_path, temp_dir) =
        create_temp_snippet_file(&generate_snippet(&test_device_basic()).unwrap());

    let output = pagecraft(temp_dir.path())
        .args(["import", "--snippet", snippet_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--device-id"));
}

#[test]
fn test_import_missing_snippet_exits_2() {
    let temp_dir = tempfile::TempDir::new().unwrap();

    let output = pagecraft(temp_dir.path())
        .args(["import", "--snippet", "/nonexistent/snippet.yaml", "--device-id", "dev1"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}
