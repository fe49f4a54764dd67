use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn formink_cmd() -> Command {
    Command::cargo_bin("formink").expect("binary exists")
}

/// Writes a white PNG form and a config whose catalog points at it.
fn write_fixture(dir: &Path) -> std::path::PathBuf {
    let rgba = [255, 255, 255, 255].repeat(64 * 48);
    let png = formink::draw::Surface::from_rgba(64, 48, &rgba)
        .unwrap()
        .to_png_bytes()
        .unwrap();
    std::fs::write(dir.join("vital chart.png"), png).unwrap();

    let config_path = dir.join("config.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[catalog]
directory = '{}'

[[catalog.forms]]
name = "VITAL CHART"
url = "vital chart.png"

[[catalog.forms]]
name = "NURSES NOTES"
url = "notes.jpg"
"#,
            dir.display()
        ),
    )
    .unwrap();
    config_path
}

#[test]
fn formink_help_prints_usage() {
    formink_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Annotate scanned clinical forms"))
        .stdout(predicate::str::contains("replay"));
}

#[test]
fn forms_lists_catalog_with_default_first() {
    let temp = TempDir::new().unwrap();
    let config = write_fixture(temp.path());

    formink_cmd()
        .arg("forms")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("1. VITAL CHART (default)"))
        .stdout(predicate::str::contains("2. NURSES NOTES"));
}

#[test]
fn forms_without_config_reports_empty_catalog() {
    let temp = TempDir::new().unwrap();

    formink_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .arg("forms")
        .assert()
        .success()
        .stdout(predicate::str::contains("No forms configured"));
}

#[test]
fn missing_config_path_fails() {
    let temp = TempDir::new().unwrap();

    formink_cmd()
        .args(["forms", "--config"])
        .arg(temp.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn init_config_writes_once() {
    let temp = TempDir::new().unwrap();

    formink_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .arg("init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote example config"));
    assert!(temp.path().join("formink").join("config.toml").exists());

    formink_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .arg("init-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn replay_writes_exports() {
    let temp = TempDir::new().unwrap();
    let config = write_fixture(temp.path());
    let out = temp.path().join("out");
    let script = temp.path().join("session.json");
    std::fs::write(
        &script,
        r#"{
            "subject": { "name": "Jane Doe", "identifier": "MR-0042", "contact": "+1 555 0100" },
            "date": "2026-03-07",
            "steps": [
                { "action": "pointer_down", "x": 10, "y": 10, "t": 0 },
                { "action": "pointer_move", "x": 30, "y": 20, "t": 10 },
                { "action": "pointer_move", "x": 50, "y": 30, "t": 20 },
                { "action": "pointer_up", "x": 50, "y": 30, "t": 30 },
                { "action": "export_image" },
                { "action": "export_document" },
                { "action": "print" },
                { "action": "message" }
            ]
        }"#,
    )
    .unwrap();

    formink_cmd()
        .arg("replay")
        .arg(&script)
        .arg("--config")
        .arg(&config)
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Form saved as PNG"))
        .stdout(predicate::str::contains(
            "Message: Hi Jane Doe, your VITAL CHART is ready. MR No: MR-0042",
        ))
        .stdout(predicate::str::contains("Handoff: https://wa.me/15550100?text="));

    for ext in ["png", "pdf", "html"] {
        let path = out.join(format!("Jane_Doe_VITAL_CHART_2026-03-07.{}", ext));
        assert!(path.exists(), "missing {}", path.display());
    }
}

#[test]
fn replay_reports_failed_steps() {
    let temp = TempDir::new().unwrap();
    let config = write_fixture(temp.path());
    let script = temp.path().join("session.json");
    std::fs::write(
        &script,
        r#"{
            "subject": { "name": "Jane", "identifier": "1" },
            "form": "NURSES NOTES",
            "steps": [{ "action": "undo" }]
        }"#,
    )
    .unwrap();

    formink_cmd()
        .arg("replay")
        .arg(&script)
        .arg("--config")
        .arg(&config)
        .arg("--output-dir")
        .arg(temp.path().join("out"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed to load form: NURSES NOTES"))
        .stdout(predicate::str::contains("2 step(s) failed"));
}

#[test]
fn replay_rejects_malformed_script() {
    let temp = TempDir::new().unwrap();
    let config = write_fixture(temp.path());
    let script = temp.path().join("broken.json");
    std::fs::write(&script, "{ not json").unwrap();

    formink_cmd()
        .arg("replay")
        .arg(&script)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse"));
}
