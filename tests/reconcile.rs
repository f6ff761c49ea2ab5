//! End-to-end reconciliation: CSV text → parsed rows → driver → in-memory
//! repository.
//!
//! Exercises the full pipeline the `run` command wires together, with the
//! network collaborators replaced by `MemoryRepository` and CSV literals.

use artsync::{
    parse_sheet, ClaimValue, Item, ItemId, MemoryRepository, Mutation, Reconciler, RunStats,
    SyncConfig,
};
use std::sync::Arc;

const HEADER: &str = "Kohde,Lon,Lat,Nimi,Tekijä,Valmistunut,Huom,Wikipedia\n";

fn setup(repo: &Arc<MemoryRepository>) -> Reconciler {
    Reconciler::new(repo.clone(), SyncConfig::wikidata("unused"))
}

fn run_csv(reconciler: &Reconciler, body: &str) -> RunStats {
    let rows = parse_sheet(format!("{HEADER}{body}").as_bytes()).unwrap();
    reconciler.run(&rows).unwrap()
}

#[test]
fn rows_without_valid_reference_submit_nothing() {
    let repo = Arc::new(MemoryRepository::new());
    let reconciler = setup(&repo);

    let stats = run_csv(
        &reconciler,
        "ei linkkiä,21.7975,61.4857,Patsas,Essi Esimerkki,,,\n\
         www.wikidata.org/wiki/Q1,21.7975,61.4857,Patsas,,,,\n\
         ,,,,,,,\n",
    );

    assert_eq!(stats.rows_seen, 3);
    assert_eq!(stats.rows_skipped, 3);
    assert!(repo.mutations().is_empty());
}

#[test]
fn coordinate_fact_has_fixed_precision() {
    let repo = Arc::new(MemoryRepository::new());
    repo.insert_item(
        Item::new(ItemId::new("Q1")).with_claim("P17", ClaimValue::Item(ItemId::new("Q33"))),
    );
    let reconciler = setup(&repo);

    let stats = run_csv(
        &reconciler,
        "https://www.wikidata.org/wiki/Q1,21.7975,61.4857,,,,,\n",
    );

    assert_eq!(stats.coordinates_added, 1);
    let mutations = repo.mutations();
    assert_eq!(mutations.len(), 1);
    match &mutations[0] {
        Mutation::Claim {
            property,
            value: ClaimValue::Coordinate(c),
            ..
        } => {
            assert_eq!(property, "P625");
            assert_eq!(c.longitude, 21.7975);
            assert_eq!(c.latitude, 61.4857);
            assert_eq!(c.precision, 0.0001);
        }
        other => panic!("expected a coordinate claim, got {other:?}"),
    }
}

#[test]
fn partial_coordinates_submit_nothing() {
    let repo = Arc::new(MemoryRepository::new());
    repo.insert_item(
        Item::new(ItemId::new("Q1")).with_claim("P17", ClaimValue::Item(ItemId::new("Q33"))),
    );
    let reconciler = setup(&repo);

    let stats = run_csv(
        &reconciler,
        "https://www.wikidata.org/wiki/Q1,21.7975,,,,,,\n\
         https://www.wikidata.org/wiki/Q1,,61.4857,,,,,\n",
    );

    assert_eq!(stats.coordinates_added, 0);
    assert!(repo.mutations().is_empty());
}

#[test]
fn sitelink_title_is_decoded() {
    let repo = Arc::new(MemoryRepository::new());
    repo.insert_item(
        Item::new(ItemId::new("Q1")).with_claim("P17", ClaimValue::Item(ItemId::new("Q33"))),
    );
    let reconciler = setup(&repo);

    run_csv(
        &reconciler,
        "https://www.wikidata.org/wiki/Q1,,,,,,,https://fi.wikipedia.org/wiki/Puisto_patsas\n",
    );

    assert_eq!(
        repo.mutations(),
        vec![Mutation::Sitelink {
            item: ItemId::new("Q1"),
            site: "fiwiki".to_string(),
            title: "Puisto patsas".to_string(),
        }]
    );
}

#[test]
fn creator_cardinality_policy() {
    let repo = Arc::new(MemoryRepository::new());
    for id in ["Q1", "Q2", "Q3"] {
        repo.insert_item(
            Item::new(ItemId::new(id)).with_claim("P17", ClaimValue::Item(ItemId::new("Q33"))),
        );
    }
    repo.set_search_results("Yksi Osuma", vec![ItemId::new("Q10")]);
    repo.set_search_results("Kaksi Osumaa", vec![ItemId::new("Q10"), ItemId::new("Q11")]);
    let reconciler = setup(&repo);

    let stats = run_csv(
        &reconciler,
        "https://www.wikidata.org/wiki/Q1,,,,Yksi Osuma,,,\n\
         https://www.wikidata.org/wiki/Q2,,,,Kaksi Osumaa,,,\n\
         https://www.wikidata.org/wiki/Q3,,,,Nolla Osumaa,,,\n",
    );

    assert_eq!(stats.creators_added, 1);
    assert_eq!(
        repo.mutations(),
        vec![Mutation::Claim {
            item: ItemId::new("Q1"),
            property: "P170".to_string(),
            value: ClaimValue::Item(ItemId::new("Q10")),
        }]
    );
}

#[test]
fn populated_country_receives_no_fact() {
    let repo = Arc::new(MemoryRepository::new());
    // Already claims a different country; still blocks
    repo.insert_item(
        Item::new(ItemId::new("Q1")).with_claim("P17", ClaimValue::Item(ItemId::new("Q34"))),
    );
    let reconciler = setup(&repo);

    let stats = run_csv(&reconciler, "https://www.wikidata.org/wiki/Q1,,,,,,,\n");

    assert_eq!(stats.countries_added, 0);
    assert!(repo.mutations().is_empty());
}

#[test]
fn second_pass_is_idempotent() {
    let repo = Arc::new(MemoryRepository::new());
    repo.insert_item(Item::new(ItemId::new("Q1")));
    repo.set_search_results("Essi Esimerkki", vec![ItemId::new("Q10")]);
    let reconciler = setup(&repo);
    let body = "https://www.wikidata.org/wiki/Q1,21.7975,61.4857,Patsas,Essi Esimerkki,,,https://fi.wikipedia.org/wiki/Patsas\n";

    let first = run_csv(&reconciler, body);
    assert_eq!(first.facts_added(), 5);
    assert_eq!(repo.mutations().len(), 5);

    let second = run_csv(&reconciler, body);
    assert_eq!(second.facts_added(), 0);
    assert_eq!(repo.mutations().len(), 5);
}

#[test]
fn missing_items_are_skipped_and_redirects_resolved() {
    let repo = Arc::new(MemoryRepository::new());
    repo.insert_item(Item::new(ItemId::new("Q20")));
    repo.add_redirect(ItemId::new("Q19"), ItemId::new("Q20"));
    let reconciler = setup(&repo);

    let stats = run_csv(
        &reconciler,
        "https://www.wikidata.org/wiki/Q404,,,Kadonnut,,,,\n\
         https://www.wikidata.org/wiki/Q19,,,Ohjattu,,,,\n",
    );

    assert_eq!(stats.items_missing, 1);
    // Label and country land on the canonical item, not the redirect
    let target = repo.item(&ItemId::new("Q20")).unwrap();
    assert!(target.has_claim("P17"));
    assert_eq!(target.labels.get("fi").unwrap(), "Ohjattu");
}
