//! Run configuration
//!
//! Every fixed property/item identifier the reconciler targets is threaded
//! through this one struct; nothing is read from ambient globals. The
//! defaults are the Wikidata identifiers for Finnish public art.

use crate::repo::ItemId;

/// Configuration for one synchronization run
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Published CSV export of the source spreadsheet
    pub sheet_url: String,
    /// Action-API endpoint of the knowledge base
    pub endpoint: String,
    /// Property holding the geocoordinate ("coordinate location")
    pub coordinate_property: String,
    /// Property holding the country
    pub country_property: String,
    /// Item every row's country claim points at
    pub country_item: ItemId,
    /// Property holding the creator
    pub creator_property: String,
    /// Language whose label the sheet supplies
    pub label_language: String,
    /// Site key of the wiki edition the sheet links to
    pub sitelink_site: String,
}

impl SyncConfig {
    /// Wikidata defaults: P625 coordinates, P17 country → Q33 (Finland),
    /// P170 creator, Finnish labels, Finnish Wikipedia sitelinks.
    pub fn wikidata(sheet_url: impl Into<String>) -> Self {
        Self {
            sheet_url: sheet_url.into(),
            endpoint: "https://www.wikidata.org/w/api.php".to_string(),
            coordinate_property: "P625".to_string(),
            country_property: "P17".to_string(),
            country_item: ItemId::new("Q33"),
            creator_property: "P170".to_string(),
            label_language: "fi".to_string(),
            sitelink_site: "fiwiki".to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_coordinate_property(mut self, property: impl Into<String>) -> Self {
        self.coordinate_property = property.into();
        self
    }

    pub fn with_country(mut self, property: impl Into<String>, item: ItemId) -> Self {
        self.country_property = property.into();
        self.country_item = item;
        self
    }

    pub fn with_creator_property(mut self, property: impl Into<String>) -> Self {
        self.creator_property = property.into();
        self
    }

    pub fn with_label_language(mut self, language: impl Into<String>) -> Self {
        self.label_language = language.into();
        self
    }

    pub fn with_sitelink_site(mut self, site: impl Into<String>) -> Self {
        self.sitelink_site = site.into();
        self
    }
}
