//! Repository trait definitions

use super::item::{ClaimValue, Item, ItemId};
use thiserror::Error;

/// Errors that can occur during repository operations
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {code}: {info}")]
    Api { code: String, info: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Outcome of a single fact submission.
///
/// `Rejected` is the uniform non-fatal path: the knowledge base refused this
/// one fact (for example a coordinate on an unsupported globe) but the run
/// continues. Fatal conditions travel as `Err(RepoError)` instead.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The fact was stored
    Added,
    /// The knowledge base refused the fact; reason is operator-facing text
    Rejected(String),
}

impl SubmitOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added)
    }
}

/// Trait for knowledge-base clients
///
/// Implementations must be thread-safe (Send + Sync). All mutating calls
/// only ever add facts, never overwrite, so re-running them is safe.
pub trait ItemRepository: Send + Sync {
    /// Fetch an item by ID, resolving redirects to the canonical target.
    /// Returns `None` when the item does not exist.
    fn fetch_item(&self, id: &ItemId) -> RepoResult<Option<Item>>;

    /// Attach a new claim to the item
    fn add_claim(&self, id: &ItemId, property: &str, value: &ClaimValue)
        -> RepoResult<SubmitOutcome>;

    /// Set the item's label for a language
    fn set_label(&self, id: &ItemId, language: &str, text: &str) -> RepoResult<SubmitOutcome>;

    /// Set the item's page title for a site
    fn set_sitelink(&self, id: &ItemId, site: &str, title: &str) -> RepoResult<SubmitOutcome>;

    /// Fuzzy text search for items, capped at `limit` results
    fn search_items(&self, query: &str, language: &str, limit: usize)
        -> RepoResult<Vec<ItemId>>;
}
