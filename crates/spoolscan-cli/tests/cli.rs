use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SLICER_TEXT: &str = "Print time: 2h 35m\nWeight: 25.3g\nPrice: $12.99\n";

fn spoolscan(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("spoolscan").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home).env("HOME", config_home);
    cmd
}

#[test]
fn test_extract_text_file_json() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("slicer.txt");
    fs::write(&input, SLICER_TEXT).unwrap();

    spoolscan(dir.path())
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"durationMinutes\": 155"))
        .stdout(predicate::str::contains("\"price\": \"12.99\""))
        .stdout(predicate::str::contains("\"weightGrams\": \"25.3\""));
}

#[test]
fn test_extract_stdin_text_format() {
    let dir = TempDir::new().unwrap();

    spoolscan(dir.path())
        .args(["extract", "-", "--format", "text", "--explain"])
        .write_stdin("Filament used: 1.2kg")
        .assert()
        .success()
        .stdout(predicate::str::contains("Weight:     1200 g"))
        .stdout(predicate::str::contains("weight    kilograms \"1.2kg\""))
        .stderr(predicate::str::contains("Found 1 of 3 facts"));
}

#[test]
fn test_extract_nothing_found() {
    let dir = TempDir::new().unwrap();

    spoolscan(dir.path())
        .args(["extract", "-", "--format", "csv"])
        .write_stdin("no useful info here")
        .assert()
        .success()
        .stdout(predicate::str::contains(",,,no useful info here"))
        .stderr(predicate::str::contains("No print time, price or weight found"));
}

#[test]
fn test_extract_missing_file() {
    let dir = TempDir::new().unwrap();

    spoolscan(dir.path())
        .args(["extract", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_extract_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("facts.json");

    spoolscan(dir.path())
        .args(["extract", "-", "--output"])
        .arg(&output)
        .write_stdin("3:45")
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["durationMinutes"], 225);
    assert_eq!(json["rawText"], "3:45");
}

#[cfg(unix)]
#[test]
fn test_extract_image_through_ocr_command() {
    let dir = TempDir::new().unwrap();
    let image = dir.path().join("display.png");
    fs::write(&image, "Elapsed 1:05\n").unwrap();

    // `cat` stands in for the OCR engine
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"ocr": {"command": "cat", "args": ["{input}"]}}"#).unwrap();

    spoolscan(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("extract")
        .arg(&image)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"durationMinutes\": 65"));
}

#[cfg(unix)]
#[test]
fn test_extract_image_ocr_failure() {
    let dir = TempDir::new().unwrap();
    let image = dir.path().join("display.png");
    fs::write(&image, "").unwrap();

    spoolscan(dir.path())
        .args(["extract", "--ocr-command", "false"])
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("OCR command exited"));
}

#[test]
fn test_batch_with_summary() {
    let dir = TempDir::new().unwrap();
    let inputs = dir.path().join("inputs");
    let outputs = dir.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("a.txt"), SLICER_TEXT).unwrap();
    fs::write(inputs.join("b.txt"), "25g 0.5kg").unwrap();
    fs::write(inputs.join("ignored.stl"), "solid").unwrap();
    fs::write(inputs.join("c.txt"), "nothing to see").unwrap();

    let pattern = format!("{}/*", inputs.display());

    spoolscan(dir.path())
        .args(["batch", &pattern, "--summary", "--output-dir"])
        .arg(&outputs)
        .assert()
        .success()
        .stderr(predicate::str::contains("Found 3 files"))
        .stderr(predicate::str::contains("1 with no facts found"));

    let summary = fs::read_to_string(outputs.join("summary.csv")).unwrap();
    assert!(summary.contains("a.txt,success,155,12.99,25.3,"));
    assert!(summary.contains("b.txt,success,,,25,"));

    let b: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(outputs.join("b.txt.json")).unwrap()).unwrap();
    assert_eq!(b["weightGrams"], "25");
    assert!(!outputs.join("ignored.stl.json").exists());
}

#[test]
fn test_batch_no_matches() {
    let dir = TempDir::new().unwrap();
    let pattern = format!("{}/*.txt", dir.path().display());

    spoolscan(dir.path())
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn test_config_init_set_get() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("conf").join("config.json");

    spoolscan(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    spoolscan(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "extraction.gram_confusables", r#"["q"]"#])
        .assert()
        .success();

    spoolscan(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "extraction.gram_confusables"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"q\""))
        .stdout(predicate::str::contains("\"9\"").not());

    // The new glyph table now drives extraction
    spoolscan(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["extract", "-"])
        .write_stdin("Weight: 259")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"weightGrams\": null"));
}

#[test]
fn test_config_set_rejects_bad_values() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    spoolscan(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "extraction.max_grams", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_grams"));

    spoolscan(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "extraction.nope", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));

    assert!(!config.exists());
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{}").unwrap();

    spoolscan(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}
