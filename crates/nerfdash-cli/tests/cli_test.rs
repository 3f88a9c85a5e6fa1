//! End-to-end smoke tests for the nerfdash binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write_data(tmp: &TempDir) -> std::path::PathBuf {
    let path = tmp.path().join("experiments.json");
    let doc = serde_json::json!({
        "items": [
            {
                "id": 1,
                "title": "lego-nerf",
                "dataset": "lego",
                "type": "image",
                "model": "NeRF",
                "preprocessor": "COLMAP",
                "scene_type": "tabletop",
                "virtual_scene": false,
                "real_scene": true,
                "date_added": "2024-03-01T12:00:00Z",
                "date_updated": "2024-03-02T12:00:00Z",
                "psnr": 30.0,
                "ssim": 0.91,
                "opaque_obj": true,
                "open_scene": true
            },
            {
                "id": 2,
                "title": "lego-gaussian",
                "dataset": "lego",
                "type": "image",
                "model": "Gaussian",
                "preprocessor": "COLMAP",
                "scene_type": "tabletop",
                "virtual_scene": false,
                "real_scene": true,
                "date_added": "2024-03-03T12:00:00Z",
                "date_updated": "2024-03-04T12:00:00Z",
                "psnr": 34.0,
                "ssim": 0.95,
                "opaque_obj": true,
                "transparent_obj": true
            }
        ],
        "total": 2
    });
    std::fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
    path
}

#[test]
fn list_renders_the_experiment_table() {
    let tmp = TempDir::new().unwrap();
    let data = write_data(&tmp);

    Command::cargo_bin("nerfdash")
        .unwrap()
        .args(["list", "--data"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("lego-nerf"))
        .stdout(predicate::str::contains("Gaussian"))
        .stdout(predicate::str::contains("2 experiments"));
}

#[test]
fn group_by_model_shows_aggregates() {
    let tmp = TempDir::new().unwrap();
    let data = write_data(&tmp);

    Command::cargo_bin("nerfdash")
        .unwrap()
        .args(["group", "--by", "model", "--metrics", "psnr", "--data"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("NeRF"))
        .stdout(predicate::str::contains("30.00"));
}

#[test]
fn group_by_unknown_column_fails() {
    let tmp = TempDir::new().unwrap();
    let data = write_data(&tmp);

    Command::cargo_bin("nerfdash")
        .unwrap()
        .args(["group", "--by", "nope", "--data"])
        .arg(&data)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown field: nope"));
}

#[test]
fn pivot_cross_tabulates_by_model() {
    let tmp = TempDir::new().unwrap();
    let data = write_data(&tmp);

    Command::cargo_bin("nerfdash")
        .unwrap()
        .args(["pivot", "--by", "model", "--metrics", "psnr", "--data"])
        .arg(&data)
        .assert()
        .success()
        // Both records are opaque, one each per model.
        .stdout(predicate::str::contains("Opaque object (2)"))
        .stdout(predicate::str::contains("30.00"))
        .stdout(predicate::str::contains("34.00"))
        .stdout(predicate::str::contains("N/A"));
}

#[test]
fn export_csv_has_wire_headers() {
    let tmp = TempDir::new().unwrap();
    let data = write_data(&tmp);
    let out = tmp.path().join("table.csv");

    Command::cargo_bin("nerfdash")
        .unwrap()
        .args(["export", "--format", "csv", "--data"])
        .arg(&data)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let csv = std::fs::read_to_string(&out).unwrap();
    let header = csv.lines().next().unwrap();
    assert!(header.contains("tag_obj"));
    assert!(header.contains("preprocesing_time_s"));
    assert_eq!(csv.lines().count(), 3);
}
