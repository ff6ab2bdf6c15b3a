use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use ancil_ingest::ingestion::{extract_tables, IngestionOptions};
use ancil_ingest::registry::Registry;
use ancil_ingest::IngestionError;

const PRN_CONTENT: &str = "\
LAI2000 FILE
12:03:21 P1 1 0.482 0.021 0.914 0.527 32.1 2.18
12:05:02 P1 2 0.455 0.018 0.910 0.500 32.1 2.31
MEAN 2.24
";

fn tmp_tree(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let root = std::env::temp_dir().join(format!("ancil-ingest-{name}-{nanos}"));
    fs::create_dir_all(&root).unwrap();
    root
}

fn write_file(root: &PathBuf, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn walk_registers_instrument_logs_under_site_aware_identifiers() {
    let root = tmp_tree("happy");
    write_file(
        &root,
        "ES/field_scale/ES_F1_2017/plot_scale_data/LAI/20170714_LAI.PRN",
        PRN_CONTENT,
    );

    let mut registry = Registry::new();
    extract_tables(&root, &mut registry, &IngestionOptions::default()).unwrap();

    assert_eq!(registry.len(), 1);
    let table = registry.get("ES_F1_20170714_LAI").unwrap();
    assert_eq!(table.column_count(), 9);
    assert_eq!(table.row_count(), 2);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn excluded_and_unrecognized_files_never_become_registry_keys() {
    let root = tmp_tree("excluded");
    let site_dir = "ES/field_scale/ES_F1_2017/plot_scale_data/LAI";
    write_file(&root, &format!("{site_dir}/20170714_LAI.PRN"), PRN_CONTENT);
    write_file(&root, &format!("{site_dir}/~$20170714_GS.xlsx"), "");
    write_file(&root, &format!("{site_dir}/$recovery.PRN"), "junk");
    write_file(&root, &format!("{site_dir}/20170714_LAI.prn"), "junk");
    write_file(&root, &format!("{site_dir}/notes.txt"), "free text");
    write_file(&root, &format!("{site_dir}/export.csv"), "a,b\n1,2\n");

    let mut registry = Registry::new();
    extract_tables(&root, &mut registry, &IngestionOptions::default()).unwrap();

    assert_eq!(registry.len(), 1);
    assert!(registry.contains("ES_F1_20170714_LAI"));
    for bad in ["~", "$", "csv", "txt", "prn"] {
        assert!(
            !registry.identifiers().any(|id| id.contains(bad)),
            "no identifier should stem from a '{bad}' file"
        );
    }

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn rewalking_the_same_tree_keeps_the_first_tables() {
    let root = tmp_tree("duplicate");
    write_file(
        &root,
        "ES/field_scale/ES_F1_2017/plot_scale_data/LAI/20170714_LAI.PRN",
        PRN_CONTENT,
    );

    let mut registry = Registry::new();
    extract_tables(&root, &mut registry, &IngestionOptions::default()).unwrap();
    let first = registry.get("ES_F1_20170714_LAI").unwrap().clone();

    // Same registry, second walk: every insert is a duplicate and is rejected.
    extract_tables(&root, &mut registry, &IngestionOptions::default()).unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("ES_F1_20170714_LAI").unwrap(), &first);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn repeated_walks_accumulate_across_roots() {
    let root_a = tmp_tree("accumulate-a");
    let root_b = tmp_tree("accumulate-b");
    write_file(
        &root_a,
        "ES/field_scale/ES_F1_2017/plot_scale_data/LAI/20170714_LAI.PRN",
        PRN_CONTENT,
    );
    write_file(
        &root_b,
        "WW/field_scale/WW_C3_2017/plot_scale_data/LAI/20170802_LAI.PRN",
        PRN_CONTENT,
    );

    let mut registry = Registry::new();
    extract_tables(&root_a, &mut registry, &IngestionOptions::default()).unwrap();
    extract_tables(&root_b, &mut registry, &IngestionOptions::default()).unwrap();

    assert_eq!(registry.len(), 2);
    assert!(registry.contains("ES_F1_20170714_LAI"));
    assert!(registry.contains("WW_C3_20170802_LAI"));

    let _ = fs::remove_dir_all(&root_a);
    let _ = fs::remove_dir_all(&root_b);
}

#[test]
fn shallow_tree_aborts_with_a_layout_error() {
    let root = tmp_tree("shallow");
    write_file(&root, "ES/field_scale/20170714_LAI.PRN", PRN_CONTENT);

    let mut registry = Registry::new();
    let err = extract_tables(&root, &mut registry, &IngestionOptions::default()).unwrap_err();
    assert!(matches!(err, IngestionError::SiteLayout { .. }));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn malformed_log_aborts_the_walk() {
    let root = tmp_tree("malformed");
    write_file(
        &root,
        "ES/field_scale/ES_F1_2017/plot_scale_data/LAI/20170714_LAI.PRN",
        "banner\n9:30 sampling restarted after rain\n",
    );

    let mut registry = Registry::new();
    let err = extract_tables(&root, &mut registry, &IngestionOptions::default()).unwrap_err();
    assert!(matches!(err, IngestionError::MalformedLine { .. }));

    let _ = fs::remove_dir_all(&root);
}

#[cfg(not(feature = "excel"))]
#[test]
fn workbooks_are_skipped_with_a_warning_when_excel_is_disabled() {
    let root = tmp_tree("no-excel");
    write_file(
        &root,
        "ES/field_scale/ES_F1_2017/plot_scale_data/GS/20170714_GS.xlsx",
        "not really a workbook",
    );

    let mut registry = Registry::new();
    extract_tables(&root, &mut registry, &IngestionOptions::default()).unwrap();
    assert!(registry.is_empty());

    let _ = fs::remove_dir_all(&root);
}
