use super::*;

use std::io::Write;

#[test]
fn builtin_collection_has_unique_ids() {
    let store = StaticRecords::builtin();
    assert_eq!(store.len(), 5);
    let ids: Vec<i64> = store.records().iter().map(|record| record.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert!(StaticRecords::new(store.clone().into_records()).is_ok());
}

#[test]
fn rejects_duplicate_ids() {
    let mut records = StaticRecords::builtin().into_records();
    records[1].id = RecordId(1);
    let err = StaticRecords::new(records).expect_err("duplicate");
    assert!(matches!(err, RecordStoreError::DuplicateId(RecordId(1))));
}

#[test]
fn find_reports_missing_ids_as_none() {
    let store = StaticRecords::builtin();
    assert_eq!(
        store.find(RecordId(3)).map(|record| record.species.as_str()),
        Some("果蝇")
    );
    assert!(store.find(RecordId(42)).is_none());
}

#[test]
fn related_matches_species_or_platform_and_excludes_self() {
    let store = StaticRecords::builtin();
    let related: Vec<RecordId> = store
        .related(RecordId(1), RELATED_LIMIT)
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(related, vec![RecordId(4)]);

    assert!(store.related(RecordId(3), RELATED_LIMIT).is_empty());
    assert!(store.related(RecordId(99), RELATED_LIMIT).is_empty());
}

#[test]
fn related_respects_limit() {
    let mut records = StaticRecords::builtin().into_records();
    for record in &mut records {
        record.platform = "10X Genomics".into();
    }
    let store = StaticRecords::new(records).expect("store");
    assert_eq!(store.related(RecordId(2), 3).len(), 3);
    assert_eq!(store.related(RecordId(2), 1).len(), 1);
}

#[test]
fn loads_records_from_json_file() {
    let records = StaticRecords::builtin().into_records();
    let raw = serde_json::to_string(&records[..2]).expect("encode");

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(raw.as_bytes()).expect("write");

    let store = StaticRecords::from_json_file(file.path()).expect("load");
    assert_eq!(store.len(), 2);
    assert_eq!(store.records()[1].title, records[1].title);
}

#[test]
fn malformed_json_is_reported_with_path_context() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"[{\"id\": 1}]").expect("write");

    let err = StaticRecords::from_json_file(file.path()).expect_err("malformed");
    let rendered = format!("{err:#}");
    assert!(rendered.contains("failed to load records"), "{rendered}");
}

#[test]
fn missing_file_is_an_error_not_a_panic() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = StaticRecords::from_json_file(dir.path().join("absent.json")).expect_err("missing");
    assert!(err.to_string().contains("failed to read record file"));
}
