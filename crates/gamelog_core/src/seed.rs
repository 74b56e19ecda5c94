//! Embedded first-run seed document.
//!
//! # Responsibility
//! - Bundle the starter review collection shipped with the binary.
//! - Degrade to an empty collection when the bundled document is unusable,
//!   without failing initialization.

use crate::model::review::Review;
use log::warn;

const SEED_JSON: &str = include_str!("../assets/seed.json");

/// Parses the embedded seed document.
///
/// A malformed seed yields an empty collection and a warning; first-run
/// initialization must never fail on bundled data.
pub fn load() -> Vec<Review> {
    match serde_json::from_str::<Vec<Review>>(SEED_JSON) {
        Ok(reviews) => reviews,
        Err(err) => {
            warn!("event=seed_load module=seed status=error error={err}");
            Vec::new()
        }
    }
}
