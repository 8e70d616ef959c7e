//! Search protocol integration tests.
//!
//! These tests exercise the full pipeline: filter parsing, whitelist
//! validation, statement rendering, and execution against a real SQLite
//! database.

mod common;

use serde_json::{Value, json};

use manar_persistence::backends::sqlite::SqliteBackend;
use manar_persistence::catalog::{LANDS, RENTALS};
use manar_persistence::core::EntityStore;
use manar_persistence::error::{StoreError, ValidationError};
use manar_persistence::types::FilterSpec;

use common::create_backend;

fn filter(body: Value) -> FilterSpec {
    FilterSpec::from_json(&body).expect("Failed to parse filter")
}

async fn seed_land(
    backend: &SqliteBackend,
    reference: &str,
    governorate: &str,
    usage: &str,
) -> i64 {
    backend
        .create(
            &LANDS,
            &json!({
                "referenceNumber": reference,
                "governorate": governorate,
                "usageStatus": usage,
            }),
        )
        .await
        .expect("Failed to seed land")
        .id()
}

async fn search_ids(backend: &SqliteBackend, spec: &FilterSpec) -> Vec<i64> {
    backend
        .search(&LANDS, spec)
        .await
        .expect("Search failed")
        .iter()
        .map(|r| r.id())
        .collect()
}

// ============================================================================
// Empty Filter
// ============================================================================

#[tokio::test]
async fn test_empty_filter_returns_all_rows_newest_first() {
    let backend = create_backend();
    let first = seed_land(&backend, "LND-1", "Cairo", "vacant").await;
    let second = seed_land(&backend, "LND-2", "Giza", "active").await;
    let third = seed_land(&backend, "LND-3", "Cairo", "active").await;

    let ids = search_ids(&backend, &FilterSpec::new()).await;
    assert_eq!(ids, vec![third, second, first]);
}

#[tokio::test]
async fn test_blank_entries_do_not_constrain() {
    let backend = create_backend();
    seed_land(&backend, "LND-1", "Cairo", "vacant").await;
    seed_land(&backend, "LND-2", "Giza", "active").await;

    // an all-blank search form is the same as no filter at all
    let spec = filter(json!({ "governorate": "", "usageStatus": null }));
    assert!(spec.is_empty());
    let ids = search_ids(&backend, &spec).await;
    assert_eq!(ids.len(), 2);
}

// ============================================================================
// Conjunctive Narrowing
// ============================================================================

#[tokio::test]
async fn test_single_attribute_filter() {
    let backend = create_backend();
    let cairo_a = seed_land(&backend, "LND-1", "Cairo", "vacant").await;
    seed_land(&backend, "LND-2", "Giza", "active").await;
    let cairo_b = seed_land(&backend, "LND-3", "Cairo", "active").await;

    let ids = search_ids(&backend, &filter(json!({ "governorate": "Cairo" }))).await;
    assert_eq!(ids, vec![cairo_b, cairo_a]);
}

#[tokio::test]
async fn test_additional_attributes_narrow_results() {
    let backend = create_backend();
    seed_land(&backend, "LND-1", "Cairo", "vacant").await;
    seed_land(&backend, "LND-2", "Cairo", "active").await;
    seed_land(&backend, "LND-3", "Giza", "active").await;

    let broad = search_ids(&backend, &filter(json!({ "governorate": "Cairo" }))).await;
    let narrow = search_ids(
        &backend,
        &filter(json!({ "governorate": "Cairo", "usageStatus": "active" })),
    )
    .await;

    assert_eq!(broad.len(), 2);
    assert_eq!(narrow.len(), 1);
    assert!(narrow.iter().all(|id| broad.contains(id)));
}

#[tokio::test]
async fn test_filters_are_conjunctive_not_disjunctive() {
    let backend = create_backend();
    seed_land(&backend, "LND-1", "Cairo", "vacant").await;
    seed_land(&backend, "LND-2", "Giza", "active").await;

    // each row matches one predicate; neither matches both
    let ids = search_ids(
        &backend,
        &filter(json!({ "governorate": "Cairo", "usageStatus": "active" })),
    )
    .await;
    assert!(ids.is_empty());
}

#[tokio::test]
async fn test_governorate_filter_reads_renamed_column() {
    let backend = create_backend();
    let id = seed_land(&backend, "LND-1", "Cairo", "vacant").await;

    // the wire name stays governorate even though lands store it in the
    // headquarters column
    let records = backend
        .search(&LANDS, &filter(json!({ "governorate": "Cairo" })))
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id(), id);
    assert_eq!(records[0].get("governorate"), Some(&json!("Cairo")));
    assert!(records[0].get("headquarters").is_none());
}

// ============================================================================
// Determinism
// ============================================================================

#[tokio::test]
async fn test_repeated_search_returns_identical_sequences() {
    let backend = create_backend();
    for i in 0..5 {
        seed_land(&backend, &format!("LND-{i}"), "Cairo", "vacant").await;
    }

    let spec = filter(json!({ "governorate": "Cairo" }));
    let first = search_ids(&backend, &spec).await;
    let second = search_ids(&backend, &spec).await;
    assert_eq!(first, second);
    assert_eq!(first.len(), 5);
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_unknown_attribute_is_rejected_not_ignored() {
    let backend = create_backend();
    seed_land(&backend, "LND-1", "Cairo", "vacant").await;

    let err = backend
        .search(&LANDS, &filter(json!({ "flavor": "mint" })))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::UnknownAttribute { ref attribute, .. })
            if attribute == "flavor"
    ));
}

#[tokio::test]
async fn test_misspelled_attribute_does_not_return_everything() {
    let backend = create_backend();
    seed_land(&backend, "LND-1", "Cairo", "vacant").await;

    let result = backend
        .search(&LANDS, &filter(json!({ "governorat": "Cairo" })))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_attribute_outside_whitelist_is_rejected() {
    let backend = create_backend();

    // notes is a real column, but the search form never exposed it
    let err = backend
        .search(&LANDS, &filter(json!({ "notes": "anything" })))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

// ============================================================================
// Injection Resistance
// ============================================================================

#[tokio::test]
async fn test_sql_metacharacters_are_compared_literally() {
    let backend = create_backend();
    seed_land(&backend, "LND-1", "Cairo", "vacant").await;

    let hostile = "'; DROP TABLE lands; --";
    let ids = search_ids(&backend, &filter(json!({ "governorate": hostile }))).await;
    assert!(ids.is_empty());

    // the table is intact and still searchable
    assert_eq!(backend.count(&LANDS).await.unwrap(), 1);
    assert_eq!(search_ids(&backend, &FilterSpec::new()).await.len(), 1);
}

#[tokio::test]
async fn test_hostile_value_matches_only_itself() {
    let backend = create_backend();
    let hostile = "Cairo' OR '1'='1";
    let id = seed_land(&backend, "LND-1", hostile, "vacant").await;
    seed_land(&backend, "LND-2", "Giza", "vacant").await;

    let ids = search_ids(&backend, &filter(json!({ "governorate": hostile }))).await;
    assert_eq!(ids, vec![id]);
}

// ============================================================================
// Entity Independence
// ============================================================================

#[tokio::test]
async fn test_each_entity_searches_its_own_whitelist() {
    let backend = create_backend();
    backend
        .create(
            &RENTALS,
            &json!({
                "identificationNumber": "RNT-1",
                "status": "active",
                "buildingType": "leased",
            }),
        )
        .await
        .unwrap();

    let records = backend
        .search(&RENTALS, &filter(json!({ "status": "active" })))
        .await
        .unwrap();
    assert_eq!(records.len(), 1);

    // governorate is filterable on lands but not on rentals
    let err = backend
        .search(&RENTALS, &filter(json!({ "governorate": "Cairo" })))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}
