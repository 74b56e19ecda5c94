use gamelog_core::{
    KeyValueStore, KvReviewRepository, MemoryKeyValueStore, Review, ReviewRepository, STORAGE_KEY,
};

fn memory_repo() -> KvReviewRepository<MemoryKeyValueStore> {
    KvReviewRepository::new(MemoryKeyValueStore::new())
}

#[test]
fn initialize_on_empty_storage_persists_seed() {
    let mut repo = memory_repo();

    let reviews = repo.initialize().unwrap();
    assert!(!reviews.is_empty());

    // persisted, not just returned
    assert_eq!(repo.list().unwrap(), reviews);
}

#[test]
fn initialize_is_idempotent() {
    let mut repo = memory_repo();

    let first = repo.initialize().unwrap();
    let second = repo.initialize().unwrap();
    assert_eq!(first, second);
}

#[test]
fn initialize_returns_collection_sorted_newest_first() {
    let mut repo = memory_repo();
    let reviews = repo.initialize().unwrap();

    let timestamps: Vec<&str> = reviews.iter().map(|r| r.created_at.as_str()).collect();
    let mut sorted = timestamps.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(timestamps, sorted);
}

#[test]
fn initialize_leaves_existing_data_untouched() {
    let mut repo = memory_repo();
    let existing = Review {
        id: 10,
        title: "already here".to_string(),
        contents: "<p>kept</p>".to_string(),
        created_at: "2024-01-01 00:00:00".to_string(),
        updated_at: "2024-01-01 00:00:00".to_string(),
        ..Review::default()
    };
    repo.replace_all(std::slice::from_ref(&existing)).unwrap();

    let reviews = repo.initialize().unwrap();
    assert_eq!(reviews, vec![existing]);
}

#[test]
fn initialize_respects_an_explicitly_empty_collection() {
    let mut store = MemoryKeyValueStore::new();
    store.set(STORAGE_KEY, "[]").unwrap();
    let mut repo = KvReviewRepository::new(store);

    assert!(repo.initialize().unwrap().is_empty());
}
