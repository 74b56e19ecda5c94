use gamelog_core::{
    export_to_dir, import_from_file, BackupError, KvReviewRepository, MemoryKeyValueStore,
    ReviewDraft, ReviewRepository, BACKUP_FILE_PREFIX,
};
use std::fs;

fn memory_repo() -> KvReviewRepository<MemoryKeyValueStore> {
    KvReviewRepository::new(MemoryKeyValueStore::new())
}

fn draft(title: &str, rating: u8) -> ReviewDraft {
    ReviewDraft {
        title: title.to_string(),
        contents: "<p>body</p>".to_string(),
        rating,
        image_url: Some("https://example.com/cover.jpg".to_string()),
    }
}

#[test]
fn export_writes_timestamped_json_file() {
    let mut repo = memory_repo();
    repo.add(&draft("A", 3)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = export_to_dir(&repo, dir.path()).unwrap();

    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with(BACKUP_FILE_PREFIX), "bad name: {name}");
    assert!(name.ends_with(".json"));
    // gameData_backup_yyyy-MM-dd_HH_mm_ss.json
    let stamp = name
        .strip_prefix(BACKUP_FILE_PREFIX)
        .unwrap()
        .strip_suffix(".json")
        .unwrap();
    assert_eq!(stamp.len(), "yyyy-MM-dd_HH_mm_ss".len());
    assert!(stamp.chars().all(|c| c.is_ascii_digit() || c == '-' || c == '_'));

    // pretty-printed array on disk
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.trim_start().starts_with('['));
    assert!(text.contains('\n'));
}

#[test]
fn export_then_import_round_trips_collection() {
    let mut repo = memory_repo();
    repo.add(&draft("A", 3)).unwrap();
    repo.add(&draft("B", 5)).unwrap();
    let before = repo.list().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = export_to_dir(&repo, dir.path()).unwrap();

    let mut restored = memory_repo();
    let imported = import_from_file(&mut restored, &path).unwrap();
    assert_eq!(imported, 2);
    assert_eq!(restored.list().unwrap(), before);
}

#[test]
fn import_non_array_fails_and_leaves_storage_untouched() {
    let mut repo = memory_repo();
    repo.add(&draft("keep", 2)).unwrap();
    let before = repo.list().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{"records": []}"#).unwrap();

    let err = import_from_file(&mut repo, &path).unwrap_err();
    assert!(matches!(err, BackupError::NotAnArray));
    assert_eq!(repo.list().unwrap(), before);
}

#[test]
fn import_unparsable_json_fails_and_leaves_storage_untouched() {
    let mut repo = memory_repo();
    repo.add(&draft("keep", 2)).unwrap();
    let before = repo.list().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "not json at all {").unwrap();

    let err = import_from_file(&mut repo, &path).unwrap_err();
    assert!(matches!(err, BackupError::InvalidJson(_)));
    assert_eq!(repo.list().unwrap(), before);
}

#[test]
fn import_tolerates_records_with_missing_fields() {
    let mut repo = memory_repo();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sparse.json");
    fs::write(
        &path,
        r#"[{"id": 1, "title": "Ico"}, {"id": 2, "title": "Journey", "rating": 4}]"#,
    )
    .unwrap();

    let imported = import_from_file(&mut repo, &path).unwrap();
    assert_eq!(imported, 2);

    let reviews = repo.list().unwrap();
    assert_eq!(reviews.len(), 2);
    assert!(reviews.iter().any(|r| r.title == "Ico" && r.rating == 0));
}

#[test]
fn import_wrong_typed_field_is_a_format_error() {
    let mut repo = memory_repo();
    let before = repo.list().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("typed.json");
    fs::write(&path, r#"[{"id": 1, "title": "X", "rating": "five"}]"#).unwrap();

    let err = import_from_file(&mut repo, &path).unwrap_err();
    assert!(matches!(err, BackupError::MalformedRecord(_)));
    assert_eq!(repo.list().unwrap(), before);
}

#[test]
fn import_missing_file_is_an_io_error() {
    let mut repo = memory_repo();
    let dir = tempfile::tempdir().unwrap();

    let err = import_from_file(&mut repo, &dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, BackupError::Io(_)));
}
