//! Search API integration tests.
//!
//! Tests the wire behavior of the search operation:
//! - Empty and absent filters return the full collection, newest first
//! - Filters are conjunctive; blank entries do not constrain
//! - Attributes outside the whitelist fail the request
//! - Filter values are never interpreted as SQL
//! - A search without matches is distinct from a missing record

mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::{create_test_server, seed_land};

/// Extracts `referenceNumber` from each record of a JSON array response.
fn references(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("expected array")
        .iter()
        .map(|row| row["referenceNumber"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Listing Tests
// =============================================================================

mod listing {
    use super::*;

    #[tokio::test]
    async fn test_empty_body_returns_all_newest_first() {
        let (server, backend) = create_test_server();
        seed_land(&backend, "LND-1", "Cairo", "School").await;
        seed_land(&backend, "LND-2", "Giza", "Vacant").await;
        seed_land(&backend, "LND-3", "Cairo", "Vacant").await;

        let response = server.post("/api/lands/search").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(references(&body), vec!["LND-3", "LND-2", "LND-1"]);
    }

    #[tokio::test]
    async fn test_empty_object_filter_matches_empty_body() {
        let (server, backend) = create_test_server();
        seed_land(&backend, "LND-1", "Cairo", "School").await;
        seed_land(&backend, "LND-2", "Giza", "Vacant").await;

        let absent = server.post("/api/lands/search").await;
        let empty = server.post("/api/lands/search").json(&json!({})).await;

        absent.assert_status_ok();
        empty.assert_status_ok();
        assert_eq!(absent.json::<Value>(), empty.json::<Value>());
    }

    #[tokio::test]
    async fn test_get_collection_equals_empty_search() {
        let (server, backend) = create_test_server();
        seed_land(&backend, "LND-1", "Cairo", "School").await;
        seed_land(&backend, "LND-2", "Giza", "Vacant").await;

        let listed = server.get("/api/lands").await;
        let searched = server.post("/api/lands/search").json(&json!({})).await;

        listed.assert_status_ok();
        searched.assert_status_ok();
        assert_eq!(listed.json::<Value>(), searched.json::<Value>());
    }

    #[tokio::test]
    async fn test_empty_collection_is_empty_array() {
        let (server, _backend) = create_test_server();

        let response = server.get("/api/lands").await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!([]));
    }
}

// =============================================================================
// Filtering Tests
// =============================================================================

mod filtering {
    use super::*;

    #[tokio::test]
    async fn test_single_attribute_filter() {
        let (server, backend) = create_test_server();
        seed_land(&backend, "LND-1", "Cairo", "School").await;
        seed_land(&backend, "LND-2", "Giza", "Vacant").await;
        seed_land(&backend, "LND-3", "Cairo", "Vacant").await;

        let response = server
            .post("/api/lands/search")
            .json(&json!({ "governorate": "Cairo" }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(references(&body), vec!["LND-3", "LND-1"]);
    }

    #[tokio::test]
    async fn test_additional_attributes_narrow_the_result() {
        let (server, backend) = create_test_server();
        seed_land(&backend, "LND-1", "Cairo", "School").await;
        seed_land(&backend, "LND-2", "Cairo", "Vacant").await;
        seed_land(&backend, "LND-3", "Giza", "Vacant").await;

        let response = server
            .post("/api/lands/search")
            .json(&json!({ "governorate": "Cairo", "usageStatus": "Vacant" }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        // Both conditions hold; neither alone is enough
        assert_eq!(references(&body), vec!["LND-2"]);
    }

    #[tokio::test]
    async fn test_blank_entries_do_not_constrain() {
        let (server, backend) = create_test_server();
        seed_land(&backend, "LND-1", "Cairo", "School").await;
        seed_land(&backend, "LND-2", "Cairo", "Vacant").await;

        let response = server
            .post("/api/lands/search")
            .json(&json!({ "governorate": "Cairo", "usageStatus": "" }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(references(&body), vec!["LND-2", "LND-1"]);
    }

    #[tokio::test]
    async fn test_null_entries_do_not_constrain() {
        let (server, backend) = create_test_server();
        seed_land(&backend, "LND-1", "Cairo", "School").await;

        let response = server
            .post("/api/lands/search")
            .json(&json!({ "governorate": "Cairo", "usageStatus": null }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(references(&body), vec!["LND-1"]);
    }

    #[tokio::test]
    async fn test_no_match_is_empty_array_not_error() {
        let (server, backend) = create_test_server();
        seed_land(&backend, "LND-1", "Cairo", "School").await;

        let response = server
            .post("/api/lands/search")
            .json(&json!({ "governorate": "Aswan" }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!([]));
    }

    #[tokio::test]
    async fn test_repeated_search_is_identical() {
        let (server, backend) = create_test_server();
        seed_land(&backend, "LND-1", "Cairo", "School").await;
        seed_land(&backend, "LND-2", "Cairo", "Vacant").await;

        let filter = json!({ "governorate": "Cairo" });
        let first = server.post("/api/lands/search").json(&filter).await;
        let second = server.post("/api/lands/search").json(&filter).await;

        assert_eq!(first.json::<Value>(), second.json::<Value>());
    }
}

// =============================================================================
// Whitelist Tests
// =============================================================================

mod whitelist {
    use super::*;

    #[tokio::test]
    async fn test_unknown_attribute_is_rejected() {
        let (server, backend) = create_test_server();
        seed_land(&backend, "LND-1", "Cairo", "School").await;

        let response = server
            .post("/api/lands/search")
            .json(&json!({ "flavor": "mint" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "unknown attribute 'flavor' for lands");
    }

    #[tokio::test]
    async fn test_misspelled_attribute_is_rejected() {
        let (server, _backend) = create_test_server();

        let response = server
            .post("/api/lands/search")
            .json(&json!({ "governorat": "Cairo" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "unknown attribute 'governorat' for lands");
    }

    #[tokio::test]
    async fn test_attribute_outside_whitelist_is_rejected() {
        // notes is a stored attribute but not a filterable one
        let (server, _backend) = create_test_server();

        let response = server
            .post("/api/lands/search")
            .json(&json!({ "notes": "anything" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "unknown attribute 'notes' for lands");
    }

    #[tokio::test]
    async fn test_whitelists_are_per_entity() {
        // governorate filters lands but not rentals
        let (server, _backend) = create_test_server();

        let ok = server
            .post("/api/rentals/search")
            .json(&json!({ "status": "Active" }))
            .await;
        ok.assert_status_ok();

        let rejected = server
            .post("/api/rentals/search")
            .json(&json!({ "governorate": "Cairo" }))
            .await;
        rejected.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = rejected.json();
        assert_eq!(body["error"], "unknown attribute 'governorate' for rentals");
    }
}

// =============================================================================
// Request Body Tests
// =============================================================================

mod bodies {
    use super::*;

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let (server, _backend) = create_test_server();

        let response = server.post("/api/lands/search").text("{nope").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        let message = body["error"].as_str().unwrap_or_default();
        assert!(message.starts_with("invalid JSON body"), "got: {message}");
    }

    #[tokio::test]
    async fn test_non_object_body_is_rejected() {
        let (server, _backend) = create_test_server();

        let response = server
            .post("/api/lands/search")
            .json(&json!([1, 2, 3]))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "invalid request body: expected a JSON object");
    }
}

// =============================================================================
// Injection Tests
// =============================================================================

mod injection {
    use super::*;

    #[tokio::test]
    async fn test_sql_metacharacters_are_literal_values() {
        let (server, backend) = create_test_server();
        seed_land(&backend, "LND-1", "Cairo", "School").await;
        seed_land(&backend, "LND-2", "Giza", "Vacant").await;

        let response = server
            .post("/api/lands/search")
            .json(&json!({ "governorate": "x' OR '1'='1" }))
            .await;

        // Nothing matches; the predicate never becomes SQL text
        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!([]));

        let listed = server.get("/api/lands").await;
        listed.assert_status_ok();
        assert_eq!(listed.json::<Value>().as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_hostile_value_matches_only_itself() {
        let (server, backend) = create_test_server();
        seed_land(&backend, "LND-1", "Cairo", "School").await;
        seed_land(&backend, "LND-2", "x' OR '1'='1", "School").await;

        let response = server
            .post("/api/lands/search")
            .json(&json!({ "governorate": "x' OR '1'='1" }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(references(&body), vec!["LND-2"]);
    }

    #[tokio::test]
    async fn test_drop_table_value_leaves_table_intact() {
        let (server, backend) = create_test_server();
        seed_land(&backend, "LND-1", "Cairo", "School").await;

        let response = server
            .post("/api/lands/search")
            .json(&json!({ "governorate": "'; DROP TABLE lands; --" }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!([]));

        let listed = server.get("/api/lands").await;
        listed.assert_status_ok();
        assert_eq!(references(&listed.json::<Value>()), vec!["LND-1"]);
    }
}

// =============================================================================
// Not-Found Distinction Tests
// =============================================================================

mod not_found_distinction {
    use super::*;

    #[tokio::test]
    async fn test_missing_record_is_404_but_empty_search_is_200() {
        let (server, backend) = create_test_server();
        seed_land(&backend, "LND-1", "Cairo", "School").await;

        let lookup = server.get("/api/lands/by-reference/NOPE").await;
        lookup.assert_status_not_found();
        let lookup_body: Value = lookup.json();
        assert_eq!(lookup_body["error"], "Land not found");

        let search = server
            .post("/api/lands/search")
            .json(&json!({ "governorate": "Nowhere" }))
            .await;
        search.assert_status_ok();
        assert_eq!(search.json::<Value>(), json!([]));
    }
}

// =============================================================================
// Full Middleware Stack Tests
// =============================================================================

mod full_stack {
    use super::*;
    use axum_test::TestServer;
    use manar_persistence::backends::sqlite::SqliteBackend;
    use manar_rest::{ServerConfig, create_app_with_config};

    #[tokio::test]
    async fn test_search_through_full_app() {
        let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
        backend.init_schema().expect("Failed to init schema");
        let app = create_app_with_config(backend, ServerConfig::for_testing());
        let server = TestServer::new(app).expect("Failed to create test server");

        let created = server
            .post("/api/lands")
            .json(&json!({ "referenceNumber": "LND-1", "governorate": "Cairo" }))
            .await;
        created.assert_status(StatusCode::CREATED);

        let response = server
            .post("/api/lands/search")
            .json(&json!({ "governorate": "Cairo" }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(references(&body), vec!["LND-1"]);
    }
}
