//! Fact builders
//!
//! Each builder turns a raw row value into a ready-to-submit fact. Builders
//! never consult the item; the gap detector has already established absence.

use crate::repo::{ClaimValue, Coordinate, ItemId, ItemRepository, RepoResult};
use tracing::debug;

/// Fixed coordinate tolerance in degrees, matching the granularity of the
/// source sheet
pub const COORDINATE_PRECISION: f64 = 0.0001;

/// Only {0, 1, many} matters for creator resolution, so two results suffice
const CREATOR_SEARCH_LIMIT: usize = 2;

/// Build a coordinate claim value from the row's (longitude, latitude)
pub fn coordinate_value(longitude: f64, latitude: f64) -> ClaimValue {
    ClaimValue::Coordinate(Coordinate {
        latitude,
        longitude,
        precision: COORDINATE_PRECISION,
    })
}

/// Recover the human-readable page title from a wiki page URL: final path
/// segment, underscores to spaces, percent-decoded.
///
/// `None` when no usable title comes out (URL ends in a slash, or the
/// percent-encoding does not decode to UTF-8); whether the title names a
/// real page is only checked by the target wiki at submission time.
pub fn sitelink_title(wiki_url: &str) -> Option<String> {
    let segment = wiki_url.rsplit('/').next()?;
    let title = segment.replace('_', " ");
    let title = urlencoding::decode(&title).ok()?.into_owned();
    if title.is_empty() {
        return None;
    }
    Some(title)
}

/// Resolve a free-text creator name to an item, if the search is unambiguous.
///
/// Exactly one candidate resolves; zero or many yields `None` — ambiguity is
/// never guessed.
pub fn resolve_creator(
    repo: &dyn ItemRepository,
    name: &str,
    language: &str,
) -> RepoResult<Option<ItemId>> {
    let mut candidates = repo.search_items(name, language, CREATOR_SEARCH_LIMIT)?;
    if candidates.len() == 1 {
        Ok(Some(candidates.remove(0)))
    } else {
        debug!(name, candidates = candidates.len(), "creator not uniquely resolved");
        Ok(None)
    }
}
