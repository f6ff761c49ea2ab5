//! Item representation in the knowledge base

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable opaque identifier for a knowledge-base item (`Q…` on Wikidata)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    /// Create an ItemId from its string form
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A geographic coordinate with a fixed tolerance.
///
/// Precision reflects source-data granularity, not measurement accuracy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
    pub precision: f64,
}

/// Target value of a claim, polymorphic over value kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ClaimValue {
    /// Reference to another item
    Item(ItemId),
    /// Geographic coordinate
    Coordinate(Coordinate),
    /// Plain text
    Text(String),
    /// Point in time, in the knowledge base's own timestamp form
    Time(String),
}

/// A knowledge-base item: claims keyed by property ID, labels keyed by
/// language, sitelinks keyed by site.
///
/// An `Item` obtained from `ItemRepository::fetch_item` is always the
/// canonical record — redirects have been resolved before any claim is read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Canonical identifier
    pub id: ItemId,
    /// Claims by property ID. A present key blocks insertion for that
    /// property even when the tool could not model the value kind.
    pub claims: HashMap<String, Vec<ClaimValue>>,
    /// Localized labels by language code
    pub labels: HashMap<String, String>,
    /// External wiki page titles by site key
    pub sitelinks: HashMap<String, String>,
}

impl Item {
    /// Create an empty item with the given ID
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            claims: HashMap::new(),
            labels: HashMap::new(),
            sitelinks: HashMap::new(),
        }
    }

    /// True when the item carries any claim for the property
    pub fn has_claim(&self, property: &str) -> bool {
        self.claims.contains_key(property)
    }

    /// True when the item has a label in the language
    pub fn has_label(&self, language: &str) -> bool {
        self.labels.contains_key(language)
    }

    /// True when the item links to a page on the site
    pub fn has_sitelink(&self, site: &str) -> bool {
        self.sitelinks.contains_key(site)
    }

    /// Seed a claim (builder form, used when constructing test fixtures)
    pub fn with_claim(mut self, property: impl Into<String>, value: ClaimValue) -> Self {
        self.claims.entry(property.into()).or_default().push(value);
        self
    }

    /// Seed a label (builder form)
    pub fn with_label(mut self, language: impl Into<String>, text: impl Into<String>) -> Self {
        self.labels.insert(language.into(), text.into());
        self
    }

    /// Seed a sitelink (builder form)
    pub fn with_sitelink(mut self, site: impl Into<String>, title: impl Into<String>) -> Self {
        self.sitelinks.insert(site.into(), title.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_item_has_nothing() {
        let item = Item::new(ItemId::new("Q1"));
        assert!(!item.has_claim("P17"));
        assert!(!item.has_label("fi"));
        assert!(!item.has_sitelink("fiwiki"));
    }

    #[test]
    fn seeded_claim_is_visible() {
        let item = Item::new(ItemId::new("Q1"))
            .with_claim("P17", ClaimValue::Item(ItemId::new("Q33")));
        assert!(item.has_claim("P17"));
        assert!(!item.has_claim("P625"));
    }

    #[test]
    fn seeded_label_and_sitelink_are_visible() {
        let item = Item::new(ItemId::new("Q1"))
            .with_label("fi", "Patsas")
            .with_sitelink("fiwiki", "Patsas");
        assert!(item.has_label("fi"));
        assert!(!item.has_label("sv"));
        assert!(item.has_sitelink("fiwiki"));
        assert!(!item.has_sitelink("svwiki"));
    }

    #[test]
    fn item_id_display_roundtrip() {
        let id = ItemId::new("Q557141");
        assert_eq!(id.to_string(), "Q557141");
        assert_eq!(id.as_str(), "Q557141");
    }
}
