use std::fs;

use anthro_map::{load_mapping_table, overview, parse_mapping_table};
use anthro_model::{CurationError, StandardKey};
use tempfile::TempDir;

const MAPPING: &str = r#"{
  "sizekorea_7th": {
    "HUMAN_ID": {"standard_key": null, "present": true},
    "나이": {"standard_key": "AGE_YR", "present": true},
    "키": {"standard_key": "HEIGHT_M", "present": true, "unit": "mm"},
    "허리둘레": {"standard_key": "WAIST_CIRC_M", "present": true, "unit": "cm"},
    "젖가슴아래둘레": {"standard_key": "UNDERBUST_CIRC_M", "present": false}
  },
  "sizekorea_8th": {
    "Stature": {"standard_key": "HEIGHT_M", "present": true}
  }
}"#;

#[test]
fn loads_mapping_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("mapping.json");
    fs::write(&path, MAPPING).expect("write mapping");

    let table = load_mapping_table(&path).expect("load mapping");
    let keys: Vec<&str> = table.source_keys().collect();
    assert_eq!(keys, vec!["sizekorea_7th", "sizekorea_8th"]);

    let seventh = table.source("sizekorea_7th").expect("7th source");
    let waist = seventh.column_for(StandardKey::WaistCircM).expect("waist");
    assert_eq!(waist.unit.as_deref(), Some("cm"));
    assert!(seventh.declares_absent(StandardKey::UnderbustCircM));
    assert_eq!(
        seventh.mapped_keys(),
        vec![StandardKey::AgeYr, StandardKey::HeightM, StandardKey::WaistCircM]
    );
}

#[test]
fn overview_counts_columns() {
    let table = parse_mapping_table(MAPPING).expect("parse mapping");
    let overview = overview(&table);
    assert_eq!(overview.len(), 2);
    assert_eq!(overview[0].source_key, "sizekorea_7th");
    assert_eq!(overview[0].mapped, 3);
    assert_eq!(overview[0].unmapped, 1);
    assert_eq!(overview[0].absent, 1);
}

#[test]
fn undefined_key_is_schema_violation() {
    let error = parse_mapping_table(r#"{"s": {"c": {"standard_key": "BMI", "present": true}}}"#)
        .unwrap_err();
    assert!(error.is_schema_violation());
    assert!(error.to_string().contains("BMI"));
}

#[test]
fn malformed_json_is_parse_error() {
    let error = parse_mapping_table(r#"{"s": {"c": {"present": "yes"}}}"#).unwrap_err();
    assert!(matches!(error, CurationError::Parse { .. }));
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().expect("temp dir");
    let error = load_mapping_table(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(error, CurationError::Io { .. }));
}
