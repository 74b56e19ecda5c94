//! Review domain model.
//!
//! # Responsibility
//! - Define the persisted review record and its creation/edit inputs.
//! - Enforce field-level validation before any write path persists.
//!
//! # Invariants
//! - `id` is unique within the collection and assigned as `max + 1`.
//! - `title` and `contents` are non-empty after trimming.
//! - `rating` stays within `0..=RATING_MAX`.
//! - Serialized names (`imageUrl`, `createdAt`, `updatedAt`) match the
//!   storage/backup document shape.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable integer identifier for a review record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ReviewId = i64;

/// Highest allowed star rating.
pub const RATING_MAX: u8 = 5;

/// Validation error for review field rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Contents are empty or whitespace-only.
    EmptyContents,
    /// Rating exceeds `RATING_MAX`.
    RatingOutOfRange(u8),
}

impl Display for ReviewValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyContents => write!(f, "contents must not be empty"),
            Self::RatingOutOfRange(value) => {
                write!(f, "rating {value} is out of range 0..={RATING_MAX}")
            }
        }
    }
}

impl Error for ReviewValidationError {}

/// Canonical persisted review record.
///
/// The whole collection is stored as one JSON array of this shape. Every
/// field carries a serde default so imported documents with missing
/// per-record fields still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    /// Unique collection-local id, assigned as `max(existing ids, 0) + 1`.
    pub id: ReviewId,
    /// Game title.
    pub title: String,
    /// Rich-markup review body.
    pub contents: String,
    /// Star rating, `0..=RATING_MAX`. `0` means unrated.
    pub rating: u8,
    /// Optional cover image URL.
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    /// Creation time in `clock::TIMESTAMP_FORMAT`, set once.
    #[serde(rename = "createdAt")]
    pub created_at: String,
    /// Last-edit time in `clock::TIMESTAMP_FORMAT`.
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl Default for Review {
    fn default() -> Self {
        Self {
            id: 0,
            title: String::new(),
            contents: String::new(),
            rating: 0,
            image_url: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

impl Review {
    /// Checks field rules shared by create and edit paths.
    ///
    /// # Errors
    /// - `EmptyTitle` / `EmptyContents` for blank required fields.
    /// - `RatingOutOfRange` when `rating > RATING_MAX`.
    pub fn validate(&self) -> Result<(), ReviewValidationError> {
        if self.title.trim().is_empty() {
            return Err(ReviewValidationError::EmptyTitle);
        }
        if self.contents.trim().is_empty() {
            return Err(ReviewValidationError::EmptyContents);
        }
        if self.rating > RATING_MAX {
            return Err(ReviewValidationError::RatingOutOfRange(self.rating));
        }
        Ok(())
    }
}

/// Creation input: everything the caller provides for a new review.
///
/// Identity and timestamps are assigned by the storage layer on `add`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub title: String,
    pub contents: String,
    pub rating: u8,
    pub image_url: Option<String>,
}

/// Edit input merged over a stored record.
///
/// Outer `None` leaves the stored value unchanged. For `image_url`,
/// `Some(None)` clears the stored URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewPatch {
    pub title: Option<String>,
    pub contents: Option<String>,
    pub rating: Option<u8>,
    pub image_url: Option<Option<String>>,
}

impl ReviewPatch {
    /// Returns whether the patch carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.contents.is_none()
            && self.rating.is_none()
            && self.image_url.is_none()
    }

    /// Applies this patch onto `review`, leaving timestamps untouched.
    pub fn apply_to(&self, review: &mut Review) {
        if let Some(title) = &self.title {
            review.title = title.clone();
        }
        if let Some(contents) = &self.contents {
            review.contents = contents.clone();
        }
        if let Some(rating) = self.rating {
            review.rating = rating;
        }
        if let Some(image_url) = &self.image_url {
            review.image_url = image_url.clone();
        }
    }
}
