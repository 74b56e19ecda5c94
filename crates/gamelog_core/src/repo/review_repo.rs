//! Review collection repository: contracts and key-value implementation.
//!
//! # Responsibility
//! - Provide CRUD, export-shaped reads and wholesale replacement over the
//!   single JSON array stored under `STORAGE_KEY`.
//! - Keep serialization details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Review::validate()` before persisting.
//! - Every mutation is a full read-modify-write of the collection.
//! - Ids are assigned as `max(existing ids, 0) + 1`.
//! - Reads return snapshots sorted by `created_at` descending.

use crate::clock;
use crate::db::DbError;
use crate::model::review::{Review, ReviewDraft, ReviewId, ReviewPatch, ReviewValidationError};
use crate::repo::kv_store::KeyValueStore;
use crate::seed;
use log::info;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// The single key the whole collection is serialized under.
pub const STORAGE_KEY: &str = "gameData";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for review persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ReviewValidationError),
    Db(DbError),
    NotFound(ReviewId),
    /// Stored collection text is not a JSON array of records.
    Corrupted(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "review not found: {id}"),
            Self::Corrupted(message) => {
                write!(f, "stored review collection is corrupted: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Corrupted(_) => None,
        }
    }
}

impl From<ReviewValidationError> for RepoError {
    fn from(value: ReviewValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Repository interface for the review collection.
pub trait ReviewRepository {
    /// Seeds empty storage with the embedded document, then returns the
    /// collection. Existing data is returned untouched.
    fn initialize(&mut self) -> RepoResult<Vec<Review>>;
    /// Returns a snapshot sorted by `created_at` descending.
    fn list(&self) -> RepoResult<Vec<Review>>;
    /// Overwrites the whole stored collection, as given.
    fn replace_all(&mut self, reviews: &[Review]) -> RepoResult<()>;
    /// Validates, assigns id/timestamps, appends and persists.
    fn add(&mut self, draft: &ReviewDraft) -> RepoResult<Review>;
    /// Merges `patch` into the matching record, refreshes `updated_at`,
    /// persists. Fails with `NotFound` for a missing id.
    fn update(&mut self, id: ReviewId, patch: &ReviewPatch) -> RepoResult<Review>;
    /// Returns one record by id, if present.
    fn get(&self, id: ReviewId) -> RepoResult<Option<Review>>;
    /// Removes the matching record and persists. Fails with `NotFound` for
    /// a missing id.
    fn remove(&mut self, id: ReviewId) -> RepoResult<()>;
}

/// Review repository over any `KeyValueStore`.
pub struct KvReviewRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvReviewRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Parses the stored array in storage order. Absent key means empty.
    fn load_raw(&self) -> RepoResult<Vec<Review>> {
        match self.store.get(STORAGE_KEY)? {
            Some(text) => serde_json::from_str::<Vec<Review>>(&text)
                .map_err(|err| RepoError::Corrupted(err.to_string())),
            None => Ok(Vec::new()),
        }
    }

    fn persist(&mut self, reviews: &[Review]) -> RepoResult<()> {
        let text = serde_json::to_string(reviews)
            .map_err(|err| RepoError::Corrupted(err.to_string()))?;
        self.store.set(STORAGE_KEY, &text)?;
        Ok(())
    }
}

impl<S: KeyValueStore> ReviewRepository for KvReviewRepository<S> {
    fn initialize(&mut self) -> RepoResult<Vec<Review>> {
        if self.store.get(STORAGE_KEY)?.is_none() {
            let seeded = seed::load();
            self.persist(&seeded)?;
            info!(
                "event=storage_seed module=repo status=ok records={}",
                seeded.len()
            );
        }
        self.list()
    }

    fn list(&self) -> RepoResult<Vec<Review>> {
        let mut reviews = self.load_raw()?;
        sort_by_created_desc(&mut reviews);
        Ok(reviews)
    }

    fn replace_all(&mut self, reviews: &[Review]) -> RepoResult<()> {
        self.persist(reviews)
    }

    fn add(&mut self, draft: &ReviewDraft) -> RepoResult<Review> {
        let mut reviews = self.load_raw()?;

        let max_id = reviews.iter().map(|review| review.id).max().unwrap_or(0);
        let now = clock::formatted_now();
        let review = Review {
            id: max_id + 1,
            title: draft.title.clone(),
            contents: draft.contents.clone(),
            rating: draft.rating,
            image_url: draft.image_url.clone(),
            created_at: now.clone(),
            updated_at: now,
        };
        review.validate()?;

        reviews.push(review.clone());
        self.persist(&reviews)?;
        info!(
            "event=review_add module=repo status=ok id={} rating={}",
            review.id, review.rating
        );
        Ok(review)
    }

    fn update(&mut self, id: ReviewId, patch: &ReviewPatch) -> RepoResult<Review> {
        let mut reviews = self.load_raw()?;
        let position = reviews
            .iter()
            .position(|review| review.id == id)
            .ok_or(RepoError::NotFound(id))?;

        let mut merged = reviews[position].clone();
        patch.apply_to(&mut merged);
        merged.updated_at = clock::formatted_now();
        merged.validate()?;

        reviews[position] = merged.clone();
        self.persist(&reviews)?;
        info!("event=review_update module=repo status=ok id={id}");
        Ok(merged)
    }

    fn get(&self, id: ReviewId) -> RepoResult<Option<Review>> {
        let reviews = self.load_raw()?;
        Ok(reviews.into_iter().find(|review| review.id == id))
    }

    fn remove(&mut self, id: ReviewId) -> RepoResult<()> {
        let mut reviews = self.load_raw()?;
        let before = reviews.len();
        reviews.retain(|review| review.id != id);
        if reviews.len() == before {
            return Err(RepoError::NotFound(id));
        }

        self.persist(&reviews)?;
        info!("event=review_remove module=repo status=ok id={id}");
        Ok(())
    }
}

/// Sorts newest-first by parsed `created_at`, with id-descending tie-break.
/// Unparsable timestamps sort last.
fn sort_by_created_desc(reviews: &mut [Review]) {
    reviews.sort_by(|a, b| {
        match (
            clock::parse_timestamp(&a.created_at),
            clock::parse_timestamp(&b.created_at),
        ) {
            (Some(ta), Some(tb)) => tb.cmp(&ta).then_with(|| b.id.cmp(&a.id)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => b.id.cmp(&a.id),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::{sort_by_created_desc, KvReviewRepository, ReviewRepository, STORAGE_KEY};
    use crate::model::review::Review;
    use crate::repo::kv_store::{KeyValueStore, MemoryKeyValueStore};

    fn review(id: i64, created_at: &str) -> Review {
        Review {
            id,
            title: format!("game {id}"),
            contents: "<p>body</p>".to_string(),
            created_at: created_at.to_string(),
            updated_at: created_at.to_string(),
            ..Review::default()
        }
    }

    #[test]
    fn sort_is_newest_first_with_id_tiebreak() {
        let mut reviews = vec![
            review(1, "2024-05-01 10:00:00"),
            review(3, "2024-05-01 10:00:00"),
            review(2, "2024-06-01 10:00:00"),
        ];
        sort_by_created_desc(&mut reviews);
        let ids: Vec<i64> = reviews.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn unparsable_timestamps_sort_last() {
        let mut reviews = vec![review(1, "not a date"), review(2, "2024-05-01 10:00:00")];
        sort_by_created_desc(&mut reviews);
        assert_eq!(reviews[0].id, 2);
    }

    #[test]
    fn list_of_absent_key_is_empty() {
        let repo = KvReviewRepository::new(MemoryKeyValueStore::new());
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn corrupted_storage_surfaces_as_error() {
        let mut store = MemoryKeyValueStore::new();
        store.set(STORAGE_KEY, "{\"not\": \"an array\"}").unwrap();
        let repo = KvReviewRepository::new(store);
        assert!(repo.list().is_err());
    }
}
