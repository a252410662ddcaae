use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anthro_cli::commands::{check_mapping, key_rows, run_curate};
use anthro_cli::types::RunRequest;
use anthro_core::ConfigOverrides;
use anthro_model::{MeasurementKind, StandardKey};
use tempfile::TempDir;

const MAPPING: &str = r#"{
    "sizekorea_7th": {
        "HUMAN_ID": {"standard_key": null, "present": true},
        "나이": {"standard_key": "AGE_YR", "present": true},
        "키": {"standard_key": "HEIGHT_M", "present": true, "unit": "mm"},
        "몸무게": {"standard_key": "WEIGHT_KG", "present": true},
        "목둘레": {"standard_key": "NECK_CIRC_M", "present": false}
    }
}"#;

fn fixture(dir: &Path) -> PathBuf {
    fs::write(dir.join("mapping.json"), MAPPING).expect("mapping");
    fs::write(
        dir.join("7th.csv"),
        "HUMAN_ID,나이,키,몸무게\nK1,34,1712,65.4\nK2,45,1650,NA\nK3,61,1801,80\n",
    )
    .expect("csv");
    let config = dir.join("curate.toml");
    fs::write(
        &config,
        "mapping = \"mapping.json\"\noutput_dir = \"out\"\n\n[[sources]]\nkey = \"sizekorea_7th\"\npath = \"7th.csv\"\nsubject_id_column = \"HUMAN_ID\"\n",
    )
    .expect("config");
    config
}

#[test]
fn run_writes_every_artifact() {
    let dir = TempDir::new().expect("temp dir");
    let config = fixture(dir.path());
    let result = run_curate(&RunRequest {
        config,
        ..RunRequest::default()
    })
    .expect("run");
    assert!(!result.dry_run);
    assert_eq!(result.summary.total_rows, 3);
    let names: Vec<String> = result
        .written
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["curated.csv", "warnings.jsonl", "facts_summary.json", "facts_summary.md"]
    );
    for path in &result.written {
        assert!(path.is_file(), "{} missing", path.display());
    }
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().expect("temp dir");
    let config = fixture(dir.path());
    let result = run_curate(&RunRequest {
        config,
        dry_run: true,
        ..RunRequest::default()
    })
    .expect("run");
    assert!(result.written.is_empty());
    assert!(!dir.path().join("out").exists());
    assert_eq!(result.summary.total_rows, 3);
}

#[test]
fn overrides_reach_the_run() {
    let dir = TempDir::new().expect("temp dir");
    let config = fixture(dir.path());
    let elsewhere = dir.path().join("elsewhere");
    let result = run_curate(&RunRequest {
        config,
        dry_run: false,
        overrides: ConfigOverrides {
            output_dir: Some(elsewhere.clone()),
            warnings_top_n: Some(2),
            preserve_unmapped: true,
            ..ConfigOverrides::default()
        },
    })
    .expect("run");
    assert_eq!(result.output_dir, elsewhere);
    assert_eq!(result.summary.warnings_top_n.len(), 2);
    assert!(elsewhere.join("curated_unmapped.csv").is_file());
}

#[test]
fn invalid_override_fails_before_running() {
    let dir = TempDir::new().expect("temp dir");
    let config = fixture(dir.path());
    let error = run_curate(&RunRequest {
        config,
        dry_run: false,
        overrides: ConfigOverrides {
            zscore_threshold: Some(-1.0),
            ..ConfigOverrides::default()
        },
    })
    .expect_err("negative threshold");
    assert!(error.to_string().contains("zscore_threshold"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn key_listing_covers_the_schema() {
    let rows = key_rows();
    assert_eq!(rows.len(), StandardKey::ALL.len());
    let age = rows.iter().find(|row| row.key == StandardKey::AgeYr).expect("age");
    assert_eq!(age.kind, MeasurementKind::Age);
    assert!(!age.outlier_filtered);
    let waist = rows
        .iter()
        .find(|row| row.key == StandardKey::WaistCircM)
        .expect("waist");
    assert_eq!(waist.canonical_unit, "m");
    assert!(waist.outlier_filtered);
}

#[test]
fn check_mapping_counts_columns() {
    let dir = TempDir::new().expect("temp dir");
    fixture(dir.path());
    let overviews = check_mapping(&dir.path().join("mapping.json")).expect("valid mapping");
    assert_eq!(overviews.len(), 1);
    assert_eq!(overviews[0].mapped, 3);
    assert_eq!(overviews[0].unmapped, 1);
    assert_eq!(overviews[0].absent, 1);
}

#[test]
fn binary_exit_codes() {
    let dir = TempDir::new().expect("temp dir");
    let config = fixture(dir.path());
    let bin = env!("CARGO_BIN_EXE_anthro-curate");

    let keys = Command::new(bin).arg("keys").output().expect("run keys");
    assert!(keys.status.success());
    assert!(String::from_utf8_lossy(&keys.stdout).contains("WAIST_CIRC_M"));

    let run = Command::new(bin)
        .args(["run", "--dry-run"])
        .arg(&config)
        .output()
        .expect("run dry");
    assert!(run.status.success());

    fs::write(
        dir.path().join("bad.json"),
        r#"{"sizekorea_7th": {"키": {"standard_key": "STATURE_M", "present": true}}}"#,
    )
    .expect("bad mapping");
    let bad = Command::new(bin)
        .arg("check-mapping")
        .arg(dir.path().join("bad.json"))
        .output()
        .expect("check mapping");
    assert_eq!(bad.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&bad.stderr).contains("schema violation"));

    let missing = Command::new(bin)
        .args(["run", "does-not-exist.toml"])
        .output()
        .expect("run missing");
    assert_eq!(missing.status.code(), Some(1));
}
