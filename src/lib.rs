//! Artsync: One-Way Spreadsheet → Knowledge-Base Reconciliation
//!
//! Reads a public spreadsheet describing public-art installations and fills
//! gaps in the corresponding Wikibase items: coordinates, country, localized
//! label, wiki sitelink, and creator. Facts are only ever added where the
//! item has none; existing values are never touched, and no items are created.
//!
//! # Core Concepts
//!
//! - **Items**: knowledge-base records holding claims, labels, and sitelinks
//! - **Gaps**: fact categories an item lacks and a sheet row can supply
//! - **Reconciler**: drives per-row gap detection, fact building, submission
//!
//! # Example
//!
//! ```
//! use artsync::{MemoryRepository, Reconciler, SyncConfig};
//! use std::sync::Arc;
//!
//! let config = SyncConfig::wikidata("https://example.org/sheet.csv");
//! let repo = Arc::new(MemoryRepository::new());
//! let reconciler = Reconciler::new(repo, config);
//! // Reconciler is ready for a run over parsed sheet rows
//! ```

pub mod repo;
pub mod sheet;
pub mod sync;

pub use repo::{
    ApiRepository, ClaimValue, Coordinate, Credentials, Item, ItemId, ItemRepository,
    MemoryRepository, Mutation, RepoError, RepoResult, SubmitOutcome,
};
pub use sheet::{fetch_sheet, parse_sheet, SheetError, SheetResult, SheetRow};
pub use sync::{detect_gaps, FactGap, Reconciler, RunStats, SyncConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
