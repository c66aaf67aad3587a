mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{build_test_app, table, token, tracked_picks, MemoryStore};

fn app() -> common::TestApp {
    build_test_app(MemoryStore::new(table("tracked_picks", tracked_picks())))
}

#[tokio::test]
async fn tracker_is_scoped_filtered_and_limited() {
    let app = app();
    let res = app
        .get("/api/tracker?status=hit&sport=nba&limit=5", Some(&token(42, None)))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    let data = res.body["data"].as_array().unwrap();
    assert!(!data.is_empty() && data.len() <= 5);
    assert!(data.iter().all(|r| r["user_id"] == 42));
    assert!(data.iter().all(|r| r["status"] == "hit" && r["sport"] == "nba"));
    assert_eq!(res.body["count"], data.len());
    assert_eq!(res.body["limit"], 5);

    let statements = app.store.statements();
    assert_eq!(statements.len(), 1);
    let sql = &statements[0];
    assert_eq!(sql.params, vec![json!(42), json!("hit"), json!("nba"), json!(5)]);
    assert!(sql.query.contains("FROM \"tracked_picks\" WHERE \"user_id\" = $1"));
    assert!(sql.query.contains("ORDER BY \"created_at\" DESC"));
}

#[tokio::test]
async fn query_string_cannot_widen_scope() {
    let app = app();
    let res = app
        .get("/api/tracker?userId=7&user_id=7&limit=100", Some(&token(42, None)))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    let data = res.body["data"].as_array().unwrap();
    assert!(!data.is_empty());
    assert!(data.iter().all(|r| r["user_id"] == 42));
    assert_eq!(app.store.statements()[0].params[0], json!(42));
}

#[tokio::test]
async fn oversized_limit_is_clamped() {
    let app = app();
    let res = app.get("/api/tracker?limit=5000", Some(&token(42, None))).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["limit"], 100);
    assert_eq!(app.store.statements()[0].params, vec![json!(42), json!(100)]);
}

#[tokio::test]
async fn bad_limit_falls_back_to_default_and_offset_is_floored() {
    let app = app();
    let res = app
        .get("/api/tracker?limit=lots&offset=-3", Some(&token(42, None)))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["limit"], 20);
    assert_eq!(res.body["offset"], 0);

    let sql = &app.store.statements()[0];
    assert!(sql.query.ends_with("LIMIT $2 OFFSET $3"));
    assert_eq!(sql.params, vec![json!(42), json!(20), json!(0)]);
}

#[tokio::test]
async fn unknown_keys_are_ignored() {
    let app = app();
    let tok = token(42, None);

    app.get("/api/tracker?status=miss", Some(&tok)).await;
    app.get("/api/tracker?status=miss&order=id%20asc&drop=table", Some(&tok)).await;

    let statements = app.store.statements();
    assert_eq!(statements[0], statements[1]);
}

#[tokio::test]
async fn repeated_requests_are_identical() {
    let app = app();
    let tok = token(42, None);

    let first = app.get("/api/tracker?sport=nba&status=hit", Some(&tok)).await;
    let second = app.get("/api/tracker?status=hit&sport=nba", Some(&tok)).await;

    assert_eq!(first.body, second.body);
    let statements = app.store.statements();
    assert_eq!(statements[0], statements[1]);
}

#[tokio::test]
async fn subject_with_no_rows_gets_empty_list() {
    let app = app();
    let res = app.get("/api/tracker", Some(&token(5150, None))).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"], json!([]));
    assert_eq!(res.body["count"], 0);
}

#[tokio::test]
async fn storage_failure_is_generic() {
    let app = build_test_app(MemoryStore::failing());
    let res = app.get("/api/tracker", Some(&token(42, None))).await;

    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body, json!({ "error": "Database error" }));
}
