//! Fact-gap detection
//!
//! A gap exists only when the item has nothing at all in a fact category and
//! the row supplies a value for it. Any existing value, however different
//! from the sheet, blocks the category: this tool fills empty slots, it does
//! not compare or update.

use super::config::SyncConfig;
use crate::repo::Item;
use crate::sheet::SheetRow;

/// A fact category the item lacks, carrying the raw row value it will be
/// built from
#[derive(Debug, Clone, PartialEq)]
pub enum FactGap {
    Coordinate { longitude: f64, latitude: f64 },
    Country,
    Sitelink { url: String },
    Label { text: String },
    Creator { name: String },
}

impl FactGap {
    /// Category name for logs and stats
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Coordinate { .. } => "coordinate",
            Self::Country => "country",
            Self::Sitelink { .. } => "sitelink",
            Self::Label { .. } => "label",
            Self::Creator { .. } => "creator",
        }
    }
}

/// Detect every gap the row can fill, in fixed order: coordinate, country,
/// sitelink, label, creator. The order carries no dependency; it is kept
/// stable so runs log deterministically.
pub fn detect_gaps(item: &Item, row: &SheetRow, config: &SyncConfig) -> Vec<FactGap> {
    let mut gaps = Vec::new();

    if let Some((longitude, latitude)) = row.coordinates {
        if !item.has_claim(&config.coordinate_property) {
            gaps.push(FactGap::Coordinate {
                longitude,
                latitude,
            });
        }
    }

    // The country needs nothing from the row; every piece on the sheet is in
    // the configured country.
    if !item.has_claim(&config.country_property) {
        gaps.push(FactGap::Country);
    }

    if !row.wiki_url.is_empty() && !item.has_sitelink(&config.sitelink_site) {
        gaps.push(FactGap::Sitelink {
            url: row.wiki_url.clone(),
        });
    }

    if !row.label.is_empty() && !item.has_label(&config.label_language) {
        gaps.push(FactGap::Label {
            text: row.label.clone(),
        });
    }

    if !row.creator.is_empty() && !item.has_claim(&config.creator_property) {
        gaps.push(FactGap::Creator {
            name: row.creator.clone(),
        });
    }

    gaps
}
