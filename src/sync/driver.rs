//! Reconciliation driver
//!
//! Sequential, one row at a time: fetch the item, detect gaps, build and
//! submit a fact per gap. Rows without a usable reference and items that do
//! not exist are skipped; a rejected submission is logged and the row
//! continues; transport and auth failures end the run.

use super::build::{coordinate_value, resolve_creator, sitelink_title};
use super::config::SyncConfig;
use super::gap::{detect_gaps, FactGap};
use crate::repo::{ClaimValue, Item, ItemRepository, RepoResult, SubmitOutcome};
use crate::sheet::SheetRow;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Counters for one synchronization pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub rows_seen: usize,
    pub rows_skipped: usize,
    pub items_missing: usize,
    pub coordinates_added: usize,
    pub countries_added: usize,
    pub sitelinks_added: usize,
    pub labels_added: usize,
    pub creators_added: usize,
    pub rejections: usize,
}

impl RunStats {
    /// Total facts added across categories
    pub fn facts_added(&self) -> usize {
        self.coordinates_added
            + self.countries_added
            + self.sitelinks_added
            + self.labels_added
            + self.creators_added
    }

    fn record_added(&mut self, gap: &FactGap) {
        match gap {
            FactGap::Coordinate { .. } => self.coordinates_added += 1,
            FactGap::Country => self.countries_added += 1,
            FactGap::Sitelink { .. } => self.sitelinks_added += 1,
            FactGap::Label { .. } => self.labels_added += 1,
            FactGap::Creator { .. } => self.creators_added += 1,
        }
    }
}

/// Drives gap detection, fact building, and submission for a run
pub struct Reconciler {
    repo: Arc<dyn ItemRepository>,
    config: SyncConfig,
}

impl Reconciler {
    pub fn new(repo: Arc<dyn ItemRepository>, config: SyncConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Process every row in order. Facts submitted before a fatal error stay
    /// committed; there is no rollback.
    pub fn run(&self, rows: &[SheetRow]) -> RepoResult<RunStats> {
        let mut stats = RunStats::default();
        for row in rows {
            self.reconcile_row(row, &mut stats)?;
        }
        info!(
            rows = stats.rows_seen,
            skipped = stats.rows_skipped,
            missing = stats.items_missing,
            facts = stats.facts_added(),
            rejected = stats.rejections,
            "synchronization pass complete"
        );
        Ok(stats)
    }

    /// Reconcile one row: every applicable gap is filled in the same pass
    pub fn reconcile_row(&self, row: &SheetRow, stats: &mut RunStats) -> RepoResult<()> {
        stats.rows_seen += 1;
        let Some(reference) = &row.item else {
            stats.rows_skipped += 1;
            return Ok(());
        };
        let Some(item) = self.repo.fetch_item(reference)? else {
            stats.items_missing += 1;
            debug!(item = %reference, "item does not exist, skipping row");
            return Ok(());
        };
        info!(item = %item.id, "reconciling");
        for gap in detect_gaps(&item, row, &self.config) {
            self.fill_gap(&item, gap, stats)?;
        }
        Ok(())
    }

    fn fill_gap(&self, item: &Item, gap: FactGap, stats: &mut RunStats) -> RepoResult<()> {
        let config = &self.config;
        let outcome = match &gap {
            FactGap::Coordinate {
                longitude,
                latitude,
            } => self.repo.add_claim(
                &item.id,
                &config.coordinate_property,
                &coordinate_value(*longitude, *latitude),
            )?,
            FactGap::Country => self.repo.add_claim(
                &item.id,
                &config.country_property,
                &ClaimValue::Item(config.country_item.clone()),
            )?,
            FactGap::Sitelink { url } => match sitelink_title(url) {
                Some(title) => {
                    self.repo
                        .set_sitelink(&item.id, &config.sitelink_site, &title)?
                }
                None => return Ok(()),
            },
            FactGap::Label { text } => {
                self.repo
                    .set_label(&item.id, &config.label_language, text)?
            }
            FactGap::Creator { name } => {
                match resolve_creator(self.repo.as_ref(), name, &config.label_language)? {
                    Some(creator) => self.repo.add_claim(
                        &item.id,
                        &config.creator_property,
                        &ClaimValue::Item(creator),
                    )?,
                    None => return Ok(()),
                }
            }
        };
        match outcome {
            SubmitOutcome::Added => {
                info!(item = %item.id, kind = gap.kind(), "fact added");
                stats.record_added(&gap);
            }
            SubmitOutcome::Rejected(reason) => {
                warn!(item = %item.id, kind = gap.kind(), %reason, "submission rejected");
                stats.rejections += 1;
            }
        }
        Ok(())
    }
}
