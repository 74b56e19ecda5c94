//! List/detail browsing session.
//!
//! # Responsibility
//! - Hold the view state of the review list: page index, page count,
//!   display mode and the visible slice.
//! - Funnel every mutation through the repository and refetch afterwards.
//!
//! # Invariants
//! - The visible slice is always `all[page * PAGE_SIZE ..][..PAGE_SIZE]` of
//!   the sorted collection.
//! - `page` stays clamped to `0..page_count` (and `0` when empty).
//! - Every mutation and page change refetches; the session never patches
//!   its slice in place.

use crate::model::review::{Review, ReviewDraft, ReviewId, ReviewPatch};
use crate::repo::review_repo::{RepoResult, ReviewRepository};
use crate::service::backup_service::{export_to_dir, import_from_file, BackupError};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Fixed number of records per page.
pub const PAGE_SIZE: usize = 8;

/// Display mode for the review list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Cards,
    Table,
}

impl Display for ViewMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cards => write!(f, "cards"),
            Self::Table => write!(f, "table"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cards" => Ok(Self::Cards),
            "table" => Ok(Self::Table),
            other => Err(format!("unknown view mode `{other}`; expected cards|table")),
        }
    }
}

/// Paged view over the review collection.
pub struct BrowseSession<R: ReviewRepository> {
    repo: R,
    page: usize,
    total: usize,
    view_mode: ViewMode,
    items: Vec<Review>,
}

impl<R: ReviewRepository> BrowseSession<R> {
    /// Opens a session: seeds empty storage, then loads the first page.
    pub fn open(repo: R) -> RepoResult<Self> {
        let mut session = Self {
            repo,
            page: 0,
            total: 0,
            view_mode: ViewMode::default(),
            items: Vec::new(),
        };
        session.repo.initialize()?;
        session.refresh()?;
        Ok(session)
    }

    /// Refetches the collection and recomputes the visible slice.
    pub fn refresh(&mut self) -> RepoResult<()> {
        let all = self.repo.list()?;
        self.total = all.len();
        self.page = self.page.min(self.page_count().saturating_sub(1));

        let start = self.page * PAGE_SIZE;
        self.items = all.into_iter().skip(start).take(PAGE_SIZE).collect();
        Ok(())
    }

    /// Zero-based current page index.
    pub fn page(&self) -> usize {
        self.page
    }

    /// `ceil(total / PAGE_SIZE)`; zero when the collection is empty.
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(PAGE_SIZE)
    }

    /// Total record count across all pages.
    pub fn total(&self) -> usize {
        self.total
    }

    /// The currently visible slice.
    pub fn items(&self) -> &[Review] {
        &self.items
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Jumps to a page (clamped into range) and refetches.
    pub fn goto_page(&mut self, page: usize) -> RepoResult<()> {
        self.page = page.min(self.page_count().saturating_sub(1));
        self.refresh()
    }

    pub fn next_page(&mut self) -> RepoResult<()> {
        self.goto_page(self.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> RepoResult<()> {
        self.goto_page(self.page.saturating_sub(1))
    }

    /// Detail lookup within the loaded slice.
    pub fn select(&self, id: ReviewId) -> Option<&Review> {
        self.items.iter().find(|review| review.id == id)
    }

    /// Detail lookup across the whole collection.
    pub fn find(&self, id: ReviewId) -> RepoResult<Option<Review>> {
        self.repo.get(id)
    }

    pub fn create(&mut self, draft: &ReviewDraft) -> RepoResult<Review> {
        let review = self.repo.add(draft)?;
        self.refresh()?;
        Ok(review)
    }

    pub fn update(&mut self, id: ReviewId, patch: &ReviewPatch) -> RepoResult<Review> {
        let review = self.repo.update(id, patch)?;
        self.refresh()?;
        Ok(review)
    }

    pub fn remove(&mut self, id: ReviewId) -> RepoResult<()> {
        self.repo.remove(id)?;
        self.refresh()
    }

    /// Writes a timestamped backup file into `dir`.
    pub fn export(&self, dir: &Path) -> Result<PathBuf, BackupError> {
        export_to_dir(&self.repo, dir)
    }

    /// Replaces the collection from a backup file, then returns to the
    /// first page.
    pub fn import(&mut self, path: &Path) -> Result<usize, BackupError> {
        let imported = import_from_file(&mut self.repo, path)?;
        self.page = 0;
        self.refresh()?;
        Ok(imported)
    }
}
