//! Review creation flow.
//!
//! # Responsibility
//! - Hold the in-progress field state of a new review.
//! - Validate before delegating to storage; reset to template afterwards.
//!
//! # Invariants
//! - A fresh or reset composer carries the rubric template as contents.
//! - Nothing is persisted until `submit` passes validation.
//! - `set_rating` only accepts `1..=RATING_MAX` (the star row has no zero
//!   star to click).

use crate::model::review::{Review, ReviewDraft, ReviewValidationError, RATING_MAX};
use crate::repo::review_repo::{RepoResult, ReviewRepository};
use crate::service::browse_service::BrowseSession;

/// Section skeleton new reviews start from.
const RUBRIC_TEMPLATE: &str = "<p><strong>Graphics</strong></p>\n\
<p><strong>Story</strong></p>\n\
<p><strong>Combat</strong></p>\n\
<p><strong>Sound</strong></p>\n\
<p><strong>Freedom</strong></p>\n\
<p><strong>Verdict</strong></p>\n";

const COVER_SEARCH_BASE: &str = "https://www.playstation.com/ko-kr/search/";

/// In-progress state of a new review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewComposer {
    pub title: String,
    pub contents: String,
    pub rating: u8,
    pub image_url: Option<String>,
}

impl Default for ReviewComposer {
    fn default() -> Self {
        Self {
            title: String::new(),
            contents: RUBRIC_TEMPLATE.to_string(),
            rating: 0,
            image_url: None,
        }
    }
}

impl ReviewComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rubric skeleton new reviews start from.
    pub fn rubric_template() -> &'static str {
        RUBRIC_TEMPLATE
    }

    /// Discards all field state back to the template.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Click-to-set star rating.
    ///
    /// # Errors
    /// - `RatingOutOfRange` for `0` or anything above `RATING_MAX`.
    pub fn set_rating(&mut self, stars: u8) -> Result<(), ReviewValidationError> {
        if stars == 0 || stars > RATING_MAX {
            return Err(ReviewValidationError::RatingOutOfRange(stars));
        }
        self.rating = stars;
        Ok(())
    }

    /// External cover-search shortcut for the current title.
    ///
    /// Returns `None` while the title is blank (the original only offers
    /// the link once a title exists). Not integrated: the caller opens it.
    pub fn cover_search_url(&self) -> Option<String> {
        let title = self.title.trim();
        if title.is_empty() {
            return None;
        }
        Some(format!(
            "{COVER_SEARCH_BASE}?q={}&category=games",
            urlencoding::encode(title)
        ))
    }

    /// Validates the current fields without submitting.
    pub fn validate(&self) -> Result<(), ReviewValidationError> {
        self.as_draft_review().validate()
    }

    /// Validates, persists through the session (which refetches), then
    /// resets this composer back to template state.
    pub fn submit<R: ReviewRepository>(
        &mut self,
        session: &mut BrowseSession<R>,
    ) -> RepoResult<Review> {
        self.validate()?;
        let draft = ReviewDraft {
            title: self.title.clone(),
            contents: self.contents.clone(),
            rating: self.rating,
            image_url: self.image_url.clone(),
        };
        let review = session.create(&draft)?;
        self.reset();
        Ok(review)
    }

    fn as_draft_review(&self) -> Review {
        Review {
            title: self.title.clone(),
            contents: self.contents.clone(),
            rating: self.rating,
            image_url: self.image_url.clone(),
            // placeholder timestamps: validate() only checks field rules
            created_at: "-".to_string(),
            updated_at: "-".to_string(),
            ..Review::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ReviewComposer, RUBRIC_TEMPLATE};
    use crate::model::review::ReviewValidationError;

    #[test]
    fn fresh_composer_carries_rubric_template() {
        let composer = ReviewComposer::new();
        assert_eq!(composer.contents, RUBRIC_TEMPLATE);
        assert_eq!(composer.rating, 0);
        assert!(composer.title.is_empty());
    }

    #[test]
    fn set_rating_accepts_star_clicks_only() {
        let mut composer = ReviewComposer::new();
        composer.set_rating(3).unwrap();
        assert_eq!(composer.rating, 3);

        assert_eq!(
            composer.set_rating(0),
            Err(ReviewValidationError::RatingOutOfRange(0))
        );
        assert_eq!(
            composer.set_rating(6),
            Err(ReviewValidationError::RatingOutOfRange(6))
        );
        assert_eq!(composer.rating, 3);
    }

    #[test]
    fn cover_search_url_requires_a_title() {
        let mut composer = ReviewComposer::new();
        assert!(composer.cover_search_url().is_none());

        composer.title = "Sekiro: Shadows Die Twice".to_string();
        let url = composer.cover_search_url().unwrap();
        assert!(url.starts_with("https://www.playstation.com/ko-kr/search/?q="));
        assert!(url.ends_with("&category=games"));
        assert!(url.contains("Sekiro%3A%20Shadows%20Die%20Twice"));
    }

    #[test]
    fn validate_blocks_blank_title() {
        let composer = ReviewComposer::new();
        assert_eq!(composer.validate(), Err(ReviewValidationError::EmptyTitle));
    }

    #[test]
    fn reset_returns_to_template_state() {
        let mut composer = ReviewComposer::new();
        composer.title = "Outer Wilds".to_string();
        composer.contents = "<p>22 minutes</p>".to_string();
        composer.set_rating(5).unwrap();

        composer.reset();
        assert_eq!(composer, ReviewComposer::new());
    }
}
