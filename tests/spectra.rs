use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use ancil_ingest::registry::Registry;
use ancil_ingest::spectra::{generate_dummy_spectra, placeholder_document};
use ancil_ingest::types::{Column, Table};
use ancil_ingest::IngestionError;

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("ancil-ingest-spectra-{name}-{nanos}"))
}

fn plot_table(plots: &[&str]) -> Table {
    Table::new(vec![Column::text(
        "Plot",
        plots.iter().map(|p| Some(p.to_string())).collect(),
    )])
}

#[test]
fn one_placeholder_per_unique_plot_and_date() {
    let out_dir = tmp_dir("unique");
    let mut registry = Registry::new();
    registry.insert("ES_F1_20170714_SPAD", plot_table(&["P1", "P1", "P2"]));

    let created = generate_dummy_spectra(&registry, &out_dir).unwrap();
    assert_eq!(created.len(), 2);
    assert!(out_dir.join("P1_20170714.pico").is_file());
    assert!(out_dir.join("P2_20170714.pico").is_file());

    let content = fs::read_to_string(out_dir.join("P1_20170714.pico")).unwrap();
    assert_eq!(content, placeholder_document());

    let _ = fs::remove_dir_all(&out_dir);
}

#[test]
fn rerunning_never_duplicates_or_overwrites() {
    let out_dir = tmp_dir("idempotent");
    let mut registry = Registry::new();
    registry.insert("ES_F1_20170714_SPAD", plot_table(&["P1"]));

    let created = generate_dummy_spectra(&registry, &out_dir).unwrap();
    assert_eq!(created.len(), 1);

    // Mark the existing file, then re-run: it must be left untouched.
    let path = out_dir.join("P1_20170714.pico");
    fs::write(&path, "sentinel").unwrap();
    let created_again = generate_dummy_spectra(&registry, &out_dir).unwrap();
    assert!(created_again.is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), "sentinel");

    let _ = fs::remove_dir_all(&out_dir);
}

#[test]
fn lai_tables_are_excluded() {
    let out_dir = tmp_dir("lai");
    let mut registry = Registry::new();
    registry.insert("ES_F1_20170714_LAI", plot_table(&["P1"]));

    let created = generate_dummy_spectra(&registry, &out_dir).unwrap();
    assert!(created.is_empty());
    assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 0);

    let _ = fs::remove_dir_all(&out_dir);
}

#[test]
fn identifier_without_a_date_segment_is_an_error() {
    let out_dir = tmp_dir("bad-id");
    let mut registry = Registry::new();
    registry.insert("SPAD", plot_table(&["P1"]));

    let err = generate_dummy_spectra(&registry, &out_dir).unwrap_err();
    assert!(matches!(err, IngestionError::IdentifierFormat { .. }));

    let _ = fs::remove_dir_all(&out_dir);
}

#[test]
fn placeholder_document_is_valid_json_with_one_dummy_spectrum() {
    let doc: serde_json::Value = serde_json::from_str(&placeholder_document()).unwrap();
    assert_eq!(doc["SequenceNumber"], 0);
    assert_eq!(doc["Spectra"].as_array().unwrap().len(), 1);
    assert_eq!(doc["Spectra"][0]["Metadata"]["Run"], "dummy");
}
