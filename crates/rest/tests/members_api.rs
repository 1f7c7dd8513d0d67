//! Member search API tests.
//!
//! Every test runs against the demo roster: teamA with member1 (10) and
//! member2 (20), teamB with member3 (30) and member4 (40).

mod common;

use serde_json::{Value, json};

use roster_rest::ServerConfig;

use common::assertions::{ages, assert_error_body, assert_status, usernames};
use common::harness::{broken_app, seeded_app, seeded_app_with_config};

fn names(list: &[&str]) -> Vec<Option<String>> {
    list.iter().map(|s| Some(s.to_string())).collect()
}

// =============================================================================
// GET /v1/members
// =============================================================================

#[tokio::test]
async fn test_search_without_filters() {
    let app = seeded_app();

    let response = app.server.get("/v1/members").await;

    assert_status(&response, 200);
    let body: Value = response.json();
    assert_eq!(
        usernames(&body),
        names(&["member1", "member2", "member3", "member4"])
    );
    assert_eq!(body[0]["teamName"], "teamA");
    assert!(body[0]["memberId"].is_i64());
    assert!(body[0]["teamId"].is_i64());
}

#[tokio::test]
async fn test_search_team_and_min_age() {
    let app = seeded_app();

    let response = app
        .server
        .get("/v1/members")
        .add_query_param("teamName", "teamA")
        .add_query_param("ageGoe", 15)
        .await;

    assert_status(&response, 200);
    let body: Value = response.json();
    assert_eq!(usernames(&body), names(&["member2"]));
    assert_eq!(body[0]["age"], 20);
}

#[tokio::test]
async fn test_search_age_range() {
    let app = seeded_app();

    let response = app.server.get("/v1/members?ageGoe=20&ageLoe=30").await;

    assert_status(&response, 200);
    assert_eq!(ages(&response.json()), vec![20, 30]);
}

#[tokio::test]
async fn test_empty_parameters_are_ignored() {
    let app = seeded_app();

    let response = app
        .server
        .get("/v1/members?username=&teamName=&ageGoe=&ageLoe=")
        .await;

    assert_status(&response, 200);
    assert_eq!(ages(&response.json()), vec![10, 20, 30, 40]);
}

#[tokio::test]
async fn test_username_contains() {
    let app = seeded_app();

    let response = app.server.get("/v1/members?usernameContains=ber3").await;

    assert_status(&response, 200);
    assert_eq!(usernames(&response.json()), names(&["member3"]));
}

#[tokio::test]
async fn test_search_sorted() {
    let app = seeded_app();

    let response = app.server.get("/v1/members?sort=age,desc").await;

    assert_status(&response, 200);
    assert_eq!(ages(&response.json()), vec![40, 30, 20, 10]);
}

#[tokio::test]
async fn test_search_ignores_paging_parameters() {
    let app = seeded_app();

    let response = app
        .server
        .get("/v1/members?page=-1&size=x&sort=age,desc")
        .await;

    assert_status(&response, 200);
    assert_eq!(ages(&response.json()), vec![40, 30, 20, 10]);
}

#[tokio::test]
async fn test_malformed_age_is_bad_request() {
    let app = seeded_app();

    let response = app.server.get("/v1/members?ageGoe=old").await;

    assert_status(&response, 400);
    assert_error_body(&response.json(), 400, "invalid");
}

#[tokio::test]
async fn test_member_without_team_has_null_team_fields() {
    let app = seeded_app();
    app.backend.insert_member(Some("loner"), 50, None).unwrap();

    let response = app.server.get("/v1/members?username=loner").await;

    assert_status(&response, 200);
    let body: Value = response.json();
    assert_eq!(body[0]["teamId"], Value::Null);
    assert_eq!(body[0]["teamName"], Value::Null);
}

// =============================================================================
// GET /v2/members
// =============================================================================

#[tokio::test]
async fn test_first_page_sorted_by_age_desc() {
    let app = seeded_app();

    let response = app
        .server
        .get("/v2/members?page=0&size=2&sort=age,desc")
        .await;

    assert_status(&response, 200);
    let body: Value = response.json();
    assert_eq!(usernames(&body["content"]), names(&["member4", "member3"]));
    assert_eq!(body["number"], 0);
    assert_eq!(body["size"], 2);
    assert_eq!(body["totalElements"], 4);
    assert_eq!(body["totalPages"], 2);
}

#[tokio::test]
async fn test_page_past_the_end() {
    let app = seeded_app();

    let response = app.server.get("/v2/members?page=1&size=10").await;

    assert_status(&response, 200);
    let body: Value = response.json();
    assert_eq!(body["content"], json!([]));
    assert_eq!(body["totalElements"], 4);
    assert_eq!(body["totalPages"], 1);
}

#[tokio::test]
async fn test_filtered_page() {
    let app = seeded_app();

    let response = app
        .server
        .get("/v2/members?teamName=teamB&page=0&size=1")
        .await;

    assert_status(&response, 200);
    let body: Value = response.json();
    assert_eq!(usernames(&body["content"]), names(&["member3"]));
    assert_eq!(body["totalElements"], 2);
    assert_eq!(body["totalPages"], 2);
}

#[tokio::test]
async fn test_default_page_size_from_config() {
    let app = seeded_app();

    let response = app.server.get("/v2/members").await;

    assert_status(&response, 200);
    let body: Value = response.json();
    assert_eq!(body["size"], ServerConfig::for_testing().default_page_size);
    assert_eq!(body["number"], 0);
    assert_eq!(body["totalElements"], 4);
}

#[tokio::test]
async fn test_page_size_capped() {
    let app = seeded_app_with_config(ServerConfig {
        max_page_size: 3,
        default_page_size: 3,
        ..ServerConfig::for_testing()
    });

    let response = app.server.get("/v2/members?size=500").await;

    assert_status(&response, 200);
    let body: Value = response.json();
    assert_eq!(body["size"], 3);
    assert_eq!(body["content"].as_array().unwrap().len(), 3);
    assert_eq!(body["totalPages"], 2);
}

#[tokio::test]
async fn test_repeated_sort_parameters() {
    let app = seeded_app();

    let response = app
        .server
        .get("/v2/members?size=10&sort=teamName,desc&sort=age,desc")
        .await;

    assert_status(&response, 200);
    let body: Value = response.json();
    assert_eq!(ages(&body["content"]), vec![40, 30, 20, 10]);
}

#[tokio::test]
async fn test_zero_page_size_is_bad_request() {
    let app = seeded_app();

    let response = app.server.get("/v2/members?size=0").await;

    assert_status(&response, 400);
    assert_error_body(&response.json(), 400, "invalid");
}

#[tokio::test]
async fn test_unknown_sort_field_is_bad_request() {
    let app = seeded_app();

    let response = app.server.get("/v2/members?sort=salary,desc").await;

    assert_status(&response, 400);
    let body: Value = response.json();
    assert_error_body(&body, 400, "invalid");
    assert!(body["message"].as_str().unwrap().contains("salary"));
}

#[tokio::test]
async fn test_negative_page_is_bad_request() {
    let app = seeded_app();

    let response = app.server.get("/v2/members?page=-1").await;

    assert_status(&response, 400);
}

// =============================================================================
// GET /v3/members and reports
// =============================================================================

#[tokio::test]
async fn test_list_members() {
    let app = seeded_app();

    let response = app.server.get("/v3/members").await;

    assert_status(&response, 200);
    let body: Value = response.json();
    assert_eq!(
        usernames(&body),
        names(&["member1", "member2", "member3", "member4"])
    );
    let first = body[0].as_object().unwrap();
    let mut keys: Vec<_> = first.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["age", "id", "teamId", "username"]);
}

#[tokio::test]
async fn test_member_stats() {
    let app = seeded_app();

    let response = app.server.get("/v1/members/stats").await;

    assert_status(&response, 200);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "count": 4,
            "ageSum": 100,
            "ageAvg": 25.0,
            "ageMax": 40,
            "ageMin": 10
        })
    );
}

#[tokio::test]
async fn test_team_age_averages() {
    let app = seeded_app();

    let response = app.server.get("/v1/teams/age-averages").await;

    assert_status(&response, 200);
    assert_eq!(
        response.json::<Value>(),
        json!([
            { "teamName": "teamA", "averageAge": 15.0 },
            { "teamName": "teamB", "averageAge": 35.0 }
        ])
    );
}

#[tokio::test]
async fn test_oldest_members() {
    let app = seeded_app();

    let response = app.server.get("/v1/members/oldest").await;

    assert_status(&response, 200);
    let body: Value = response.json();
    assert_eq!(ages(&body), vec![40]);
    assert_eq!(body[0]["username"], "member4");
}

#[tokio::test]
async fn test_members_at_least_average_age() {
    let app = seeded_app();

    let response = app.server.get("/v1/members/at-least-average-age").await;

    assert_status(&response, 200);
    assert_eq!(ages(&response.json()), vec![30, 40]);
}

#[tokio::test]
async fn test_members_with_joined_team() {
    let app = seeded_app();

    let response = app.server.get("/v1/members/joined-team/teamA").await;

    assert_status(&response, 200);
    let body: Value = response.json();
    assert_eq!(
        usernames(&body),
        names(&["member1", "member2", "member3", "member4"])
    );
    assert_eq!(body[1]["teamName"], "teamA");
    assert_eq!(body[2]["teamName"], Value::Null);
    assert_eq!(body[3]["teamId"], Value::Null);
}

// =============================================================================
// POST /admin/members/relabel
// =============================================================================

#[tokio::test]
async fn test_relabel_members() {
    let app = seeded_app();

    let response = app
        .server
        .post("/admin/members/relabel")
        .json(&json!({ "ageThreshold": 28, "replacement": "guest" }))
        .await;

    assert_status(&response, 200);
    assert_eq!(response.json::<Value>(), json!({ "updated": 2 }));

    let response = app.server.get("/v1/members?username=guest").await;
    assert_eq!(ages(&response.json()), vec![10, 20]);
}

#[tokio::test]
async fn test_relabel_empty_replacement_is_bad_request() {
    let app = seeded_app();

    let response = app
        .server
        .post("/admin/members/relabel")
        .json(&json!({ "ageThreshold": 28, "replacement": " " }))
        .await;

    assert_status(&response, 400);
    assert_error_body(&response.json(), 400, "invalid");
}

#[tokio::test]
async fn test_relabel_missing_field_is_rejected() {
    let app = seeded_app();

    let response = app
        .server
        .post("/admin/members/relabel")
        .json(&json!({ "replacement": "guest" }))
        .await;

    assert!(response.status_code().is_client_error());
}

// =============================================================================
// Health and failures
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = seeded_app();

    let response = app.server.get("/health").await;

    assert_status(&response, 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "sqlite");
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let app = broken_app();

    let response = app.server.get("/v1/members").await;

    assert_status(&response, 500);
    assert_error_body(&response.json(), 500, "exception");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = seeded_app();

    let response = app.server.get("/v4/members").await;

    assert_status(&response, 404);
}

#[tokio::test]
async fn test_file_database_from_config() {
    use std::sync::Arc;

    use axum_test::TestServer;
    use roster_persistence::backends::sqlite::{SqliteBackend, SqliteBackendConfig};
    use roster_persistence::repository::SqlMemberRepository;
    use roster_rest::create_app_with_config;

    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        database_url: format!("sqlite://{}", dir.path().join("roster.db").display()),
        ..ServerConfig::for_testing()
    };

    let backend =
        SqliteBackend::connect(&config.connection_descriptor(), SqliteBackendConfig::default())
            .unwrap();
    assert!(!backend.is_memory());
    backend.init_schema().unwrap();
    backend.seed_demo().unwrap();

    let repository = SqlMemberRepository::new(Arc::new(backend));
    let server = TestServer::new(create_app_with_config(repository, config)).unwrap();

    let response = server.get("/v2/members?size=3").await;
    assert_status(&response, 200);
    assert_eq!(response.json::<Value>()["totalElements"], 4);
}
