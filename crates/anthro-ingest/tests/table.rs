use std::fs;
use std::path::PathBuf;

use anthro_ingest::{IngestError, file_sha256, read_source_table, sha256_hex};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn reads_headers_and_pads_short_rows() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(&dir, "raw.csv", "\u{feff}HUMAN_ID,키,몸무게\nK1,1712,65.3\nK2,1650\n");
    let table = read_source_table(&path, b',').expect("read table");
    assert_eq!(table.headers, vec!["HUMAN_ID", "키", "몸무게"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows[1], vec!["K2", "1650", ""]);
    assert_eq!(table.column_index("키"), Some(1));
    assert_eq!(table.cell(1, 2), "");
}

#[test]
fn header_lookup_is_exact() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(&dir, "raw.csv", "Height,height\n1,2\n");
    let table = read_source_table(&path, b',').expect("read table");
    assert_eq!(table.column_index("height"), Some(1));
    assert_eq!(table.column_index("HEIGHT"), None);
}

#[test]
fn skips_blank_lines_and_honors_delimiter() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(&dir, "raw.tsv", "\n\nA\tB\n\n1\t2\n;;\n");
    let table = read_source_table(&path, b'\t').expect("read table");
    assert_eq!(table.headers, vec!["A", "B"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[1], vec![";;", ""]);
}

#[test]
fn empty_file_has_no_header() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(&dir, "empty.csv", "\n \n");
    let error = read_source_table(&path, b',').unwrap_err();
    assert!(matches!(error, IngestError::MissingHeader { .. }));
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    let error = read_source_table(&dir.path().join("nope.csv"), b',').unwrap_err();
    assert!(matches!(error, IngestError::FileNotFound { .. }));
}

#[test]
fn file_fingerprint_matches_bytes() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(&dir, "raw.csv", "A\n1\n");
    assert_eq!(file_sha256(&path).unwrap(), sha256_hex(b"A\n1\n"));
}
