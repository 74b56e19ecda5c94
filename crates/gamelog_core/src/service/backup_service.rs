//! Backup export/import over the review collection.
//!
//! # Responsibility
//! - Write the collection to a timestamped, pretty-printed JSON file.
//! - Replace the collection from a user-supplied JSON file.
//!
//! # Invariants
//! - Import requires a top-level JSON array; anything else leaves storage
//!   untouched and fails with a format error.
//! - Import replaces the whole collection; there is no merge.

use crate::clock;
use crate::model::review::Review;
use crate::repo::review_repo::{RepoError, ReviewRepository};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

/// Filename prefix for exported backups.
pub const BACKUP_FILE_PREFIX: &str = "gameData_backup_";

pub type BackupResult<T> = Result<T, BackupError>;

/// Backup error taxonomy.
#[derive(Debug)]
pub enum BackupError {
    Io(std::io::Error),
    /// File content is not parsable JSON.
    InvalidJson(String),
    /// Parsed JSON is valid but the top-level value is not an array.
    NotAnArray,
    /// Array elements do not fit the record shape.
    MalformedRecord(String),
    Repo(RepoError),
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::InvalidJson(message) => write!(f, "file is not valid JSON: {message}"),
            Self::NotAnArray => write!(f, "backup document must be a top-level JSON array"),
            Self::MalformedRecord(message) => {
                write!(f, "backup record has an invalid shape: {message}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BackupError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RepoError> for BackupError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Writes the sorted collection into
/// `<dir>/gameData_backup_<yyyy-MM-dd_HH_mm_ss>.json` and returns the path.
pub fn export_to_dir<R: ReviewRepository>(repo: &R, dir: &Path) -> BackupResult<PathBuf> {
    let reviews = repo.list()?;
    let stamp = clock::file_stamp(&clock::formatted_now());
    let path = dir.join(format!("{BACKUP_FILE_PREFIX}{stamp}.json"));

    let text = serde_json::to_string_pretty(&reviews)
        .map_err(|err| BackupError::MalformedRecord(err.to_string()))?;
    fs::write(&path, text)?;

    info!(
        "event=backup_export module=backup status=ok records={} path={}",
        reviews.len(),
        path.display()
    );
    Ok(path)
}

/// Replaces the whole collection from a JSON backup file.
///
/// Returns the number of imported records. Storage is only touched after
/// the document passed the array and record-shape checks.
pub fn import_from_file<R: ReviewRepository>(repo: &mut R, path: &Path) -> BackupResult<usize> {
    let text = fs::read_to_string(path)?;
    let document: serde_json::Value =
        serde_json::from_str(&text).map_err(|err| BackupError::InvalidJson(err.to_string()))?;

    if !document.is_array() {
        return Err(BackupError::NotAnArray);
    }

    let reviews: Vec<Review> = serde_json::from_value(document)
        .map_err(|err| BackupError::MalformedRecord(err.to_string()))?;

    repo.replace_all(&reviews)?;
    info!(
        "event=backup_import module=backup status=ok records={} path={}",
        reviews.len(),
        path.display()
    );
    Ok(reviews.len())
}
