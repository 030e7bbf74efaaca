use std::fs;

use assert_cmd::Command;

mod common;

#[test]
fn runs() {
    let mut cmd = Command::cargo_bin("vocaug").unwrap();
    cmd.assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = Command::cargo_bin("vocaug").unwrap();
    cmd.arg("-V");
    cmd.assert().success().stdout("vocaug 0.1.0\n");
}

// Augment subcommand tests

#[test]
fn augment_writes_pairs_and_summary() {
    let temp = tempfile::tempdir().unwrap();
    common::write_png(&temp.path().join("a.png"), 60, 40);
    common::write_voc(&temp.path().join("a.xml"), &[("a", 5, 5, 30, 30)]);

    let mut cmd = Command::cargo_bin("vocaug").unwrap();
    cmd.arg("augment")
        .arg(temp.path())
        .args(["-n", "2", "--seed", "7"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("2 of 2 unit(s) succeeded"));

    let out = temp.path().join("augmentations");
    assert!(out.join("a_0.png").is_file());
    assert!(out.join("a_1.xml").is_file());
}

#[test]
fn augment_count_from_environment() {
    let temp = tempfile::tempdir().unwrap();
    common::write_png(&temp.path().join("a.png"), 20, 20);

    let mut cmd = Command::cargo_bin("vocaug").unwrap();
    cmd.env("VOCAUG_COUNT", "3").arg("augment").arg(temp.path());
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("3 of 3 unit(s) succeeded"));
}

#[test]
fn augment_json_report() {
    let temp = tempfile::tempdir().unwrap();
    common::write_png(&temp.path().join("a.png"), 20, 20);

    let mut cmd = Command::cargo_bin("vocaug").unwrap();
    cmd.arg("augment")
        .arg(temp.path())
        .args(["-n", "1", "--report", "json"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("\"succeeded\": 1"));
}

#[test]
fn augment_saves_pipeline_config() {
    let temp = tempfile::tempdir().unwrap();
    common::write_png(&temp.path().join("a.png"), 20, 20);
    let config_path = temp.path().join("pipeline.json");

    let mut cmd = Command::cargo_bin("vocaug").unwrap();
    cmd.arg("augment")
        .arg(temp.path())
        .args(["-n", "1", "--save-pipeline"])
        .arg(&config_path);
    cmd.assert().success();

    let saved = fs::read_to_string(&config_path).unwrap();
    assert!(saved.contains("\"version\": 1"));
    assert!(saved.contains("\"type\": \"random_sized_crop\""));
}

#[test]
fn augment_rejects_newer_config_version() {
    let temp = tempfile::tempdir().unwrap();
    common::write_png(&temp.path().join("a.png"), 20, 20);
    let config_path = temp.path().join("pipeline.json");
    fs::write(&config_path, r#"{"version": 99, "steps": []}"#).unwrap();

    let mut cmd = Command::cargo_bin("vocaug").unwrap();
    cmd.arg("augment")
        .arg(temp.path())
        .arg("--load-pipeline")
        .arg(&config_path);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Unsupported pipeline config version 99"));
    assert!(!temp.path().join("augmentations").exists());
}

#[test]
fn augment_fails_when_every_unit_fails() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join("bad.jpg"), b"nope").unwrap();

    let mut cmd = Command::cargo_bin("vocaug").unwrap();
    cmd.arg("augment").arg(temp.path()).args(["-n", "1"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("All 1 augmentation unit(s) failed"));
}

// CSV subcommand tests

#[test]
fn csv_writes_training_csv_by_default() {
    let temp = tempfile::tempdir().unwrap();
    common::write_voc(&temp.path().join("x.xml"), &[]);

    let mut cmd = Command::cargo_bin("vocaug").unwrap();
    cmd.arg("csv").arg(temp.path());
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Exported 1 annotation file(s)"));

    let contents = fs::read_to_string(temp.path().join("training.csv")).unwrap();
    assert!(contents.ends_with("x.jpg,,,,,\n"));
}

// View subcommand tests

#[test]
fn view_writes_overlays() {
    let temp = tempfile::tempdir().unwrap();
    common::write_png(&temp.path().join("a.png"), 30, 30);
    common::write_voc(&temp.path().join("a.xml"), &[("a", 2, 2, 20, 20)]);

    let mut cmd = Command::cargo_bin("vocaug").unwrap();
    cmd.arg("view").arg(temp.path());
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Wrote 1 overlay(s)"));
    assert!(temp.path().join("overlays/a.png").is_file());
}

#[test]
fn view_rejects_bad_font() {
    let temp = tempfile::tempdir().unwrap();
    let font = temp.path().join("font.ttf");
    fs::write(&font, b"garbage").unwrap();

    let mut cmd = Command::cargo_bin("vocaug").unwrap();
    cmd.arg("view").arg(temp.path()).arg("--font").arg(&font);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Failed to load font"));
}

// Validate subcommand tests

#[test]
fn validate_passes_on_clean_annotations() {
    let temp = tempfile::tempdir().unwrap();
    common::write_png(&temp.path().join("a.png"), 50, 50);
    common::write_voc(&temp.path().join("a.xml"), &[("a", 1, 1, 49, 49)]);

    let mut cmd = Command::cargo_bin("vocaug").unwrap();
    cmd.arg("validate").arg(temp.path());
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Validation passed"));
}

#[test]
fn validate_reports_boxes_touching_the_edge() {
    let temp = tempfile::tempdir().unwrap();
    common::write_png(&temp.path().join("a.png"), 50, 50);
    common::write_voc(&temp.path().join("a.xml"), &[("a", 1, 1, 50, 49)]);

    let mut cmd = Command::cargo_bin("vocaug").unwrap();
    cmd.arg("validate").arg(temp.path());
    cmd.assert()
        .failure()
        .stdout(predicates::str::contains("XMaxOutOfBounds"));
}
