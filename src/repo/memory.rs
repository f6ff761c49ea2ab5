//! In-memory repository (useful for testing)

use super::item::{ClaimValue, Item, ItemId};
use super::traits::{ItemRepository, RepoError, RepoResult, SubmitOutcome};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// A mutation recorded by the in-memory repository
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Claim {
        item: ItemId,
        property: String,
        value: ClaimValue,
    },
    Label {
        item: ItemId,
        language: String,
        text: String,
    },
    Sitelink {
        item: ItemId,
        site: String,
        title: String,
    },
}

/// In-memory `ItemRepository`.
///
/// Items, redirects, and search results are seeded up front; every accepted
/// mutation is applied to the stored item and appended to a log, so a second
/// pass over the same rows observes the facts the first pass added.
#[derive(Default)]
pub struct MemoryRepository {
    items: Mutex<HashMap<ItemId, Item>>,
    redirects: Mutex<HashMap<ItemId, ItemId>>,
    searches: Mutex<HashMap<String, Vec<ItemId>>>,
    rejected_properties: Mutex<HashSet<String>>,
    mutations: Mutex<Vec<Mutation>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an item
    pub fn insert_item(&self, item: Item) {
        self.items.lock().unwrap().insert(item.id.clone(), item);
    }

    /// Seed a redirect from one ID to another
    pub fn add_redirect(&self, from: ItemId, to: ItemId) {
        self.redirects.lock().unwrap().insert(from, to);
    }

    /// Seed the result list for a search query
    pub fn set_search_results(&self, query: impl Into<String>, results: Vec<ItemId>) {
        self.searches.lock().unwrap().insert(query.into(), results);
    }

    /// Make `add_claim` for a property answer `Rejected`, simulating a
    /// value the knowledge base refuses (e.g. an unsupported globe)
    pub fn reject_property(&self, property: impl Into<String>) {
        self.rejected_properties.lock().unwrap().insert(property.into());
    }

    /// Snapshot of the current state of an item
    pub fn item(&self, id: &ItemId) -> Option<Item> {
        self.items.lock().unwrap().get(id).cloned()
    }

    /// All accepted mutations, in submission order
    pub fn mutations(&self) -> Vec<Mutation> {
        self.mutations.lock().unwrap().clone()
    }

    fn resolve(&self, id: &ItemId) -> ItemId {
        let redirects = self.redirects.lock().unwrap();
        let mut current = id.clone();
        let mut seen = HashSet::new();
        while let Some(target) = redirects.get(&current) {
            if !seen.insert(current.clone()) {
                break;
            }
            current = target.clone();
        }
        current
    }

    fn with_item<T>(
        &self,
        id: &ItemId,
        apply: impl FnOnce(&mut Item) -> T,
    ) -> RepoResult<T> {
        let mut items = self.items.lock().unwrap();
        let item = items.get_mut(id).ok_or_else(|| RepoError::Api {
            code: "no-such-entity".into(),
            info: format!("no item {id}"),
        })?;
        Ok(apply(item))
    }
}

impl ItemRepository for MemoryRepository {
    fn fetch_item(&self, id: &ItemId) -> RepoResult<Option<Item>> {
        let canonical = self.resolve(id);
        Ok(self.items.lock().unwrap().get(&canonical).cloned())
    }

    fn add_claim(
        &self,
        id: &ItemId,
        property: &str,
        value: &ClaimValue,
    ) -> RepoResult<SubmitOutcome> {
        if self.rejected_properties.lock().unwrap().contains(property) {
            return Ok(SubmitOutcome::Rejected(format!(
                "value for {property} refused"
            )));
        }
        self.with_item(id, |item| {
            item.claims
                .entry(property.to_string())
                .or_default()
                .push(value.clone());
        })?;
        self.mutations.lock().unwrap().push(Mutation::Claim {
            item: id.clone(),
            property: property.to_string(),
            value: value.clone(),
        });
        Ok(SubmitOutcome::Added)
    }

    fn set_label(&self, id: &ItemId, language: &str, text: &str) -> RepoResult<SubmitOutcome> {
        self.with_item(id, |item| {
            item.labels.insert(language.to_string(), text.to_string());
        })?;
        self.mutations.lock().unwrap().push(Mutation::Label {
            item: id.clone(),
            language: language.to_string(),
            text: text.to_string(),
        });
        Ok(SubmitOutcome::Added)
    }

    fn set_sitelink(&self, id: &ItemId, site: &str, title: &str) -> RepoResult<SubmitOutcome> {
        self.with_item(id, |item| {
            item.sitelinks.insert(site.to_string(), title.to_string());
        })?;
        self.mutations.lock().unwrap().push(Mutation::Sitelink {
            item: id.clone(),
            site: site.to_string(),
            title: title.to_string(),
        });
        Ok(SubmitOutcome::Added)
    }

    fn search_items(
        &self,
        query: &str,
        _language: &str,
        limit: usize,
    ) -> RepoResult<Vec<ItemId>> {
        let mut results = self
            .searches
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default();
        results.truncate(limit);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_follows_redirects() {
        let repo = MemoryRepository::new();
        repo.insert_item(Item::new(ItemId::new("Q2")));
        repo.add_redirect(ItemId::new("Q1"), ItemId::new("Q2"));

        let item = repo.fetch_item(&ItemId::new("Q1")).unwrap().unwrap();
        assert_eq!(item.id, ItemId::new("Q2"));
    }

    #[test]
    fn fetch_missing_item_is_none() {
        let repo = MemoryRepository::new();
        assert!(repo.fetch_item(&ItemId::new("Q1")).unwrap().is_none());
    }

    #[test]
    fn add_claim_mutates_stored_item() {
        let repo = MemoryRepository::new();
        repo.insert_item(Item::new(ItemId::new("Q1")));

        let outcome = repo
            .add_claim(
                &ItemId::new("Q1"),
                "P17",
                &ClaimValue::Item(ItemId::new("Q33")),
            )
            .unwrap();
        assert!(outcome.is_added());
        assert!(repo.item(&ItemId::new("Q1")).unwrap().has_claim("P17"));
        assert_eq!(repo.mutations().len(), 1);
    }

    #[test]
    fn rejected_property_does_not_mutate() {
        let repo = MemoryRepository::new();
        repo.insert_item(Item::new(ItemId::new("Q1")));
        repo.reject_property("P625");

        let outcome = repo
            .add_claim(
                &ItemId::new("Q1"),
                "P625",
                &ClaimValue::Text("whatever".into()),
            )
            .unwrap();
        assert!(!outcome.is_added());
        assert!(!repo.item(&ItemId::new("Q1")).unwrap().has_claim("P625"));
        assert!(repo.mutations().is_empty());
    }

    #[test]
    fn claim_on_unknown_item_is_api_error() {
        let repo = MemoryRepository::new();
        let result = repo.add_claim(
            &ItemId::new("Q1"),
            "P17",
            &ClaimValue::Item(ItemId::new("Q33")),
        );
        assert!(matches!(result, Err(RepoError::Api { .. })));
    }

    #[test]
    fn search_truncates_to_limit() {
        let repo = MemoryRepository::new();
        repo.set_search_results(
            "Kauppi",
            vec![ItemId::new("Q10"), ItemId::new("Q11"), ItemId::new("Q12")],
        );

        let results = repo.search_items("Kauppi", "fi", 2).unwrap();
        assert_eq!(results.len(), 2);
        assert!(repo.search_items("nobody", "fi", 2).unwrap().is_empty());
    }
}
