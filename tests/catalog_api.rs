mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{build_test_app, table, token, MemoryStore};

fn recommendations() -> Vec<Value> {
    (1..=15)
        .map(|id| {
            json!({
                "id": id,
                "sport": if id % 2 == 0 { "nba" } else { "nhl" },
                "status": "active",
                "risk_level": if id % 3 == 0 { "high" } else { "low" },
            })
        })
        .collect()
}

#[tokio::test]
async fn recommendations_default_page() {
    let app = build_test_app(MemoryStore::new(table("predictions", recommendations())));
    let res = app.get("/api/recommendations", Some(&token(42, None))).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["limit"], 9);
    assert_eq!(res.body["count"], 9);
    assert!(res.body.get("offset").is_none());

    let sql = &app.store.statements()[0];
    assert_eq!(sql.params, vec![json!(9)]);
    assert!(sql.query.ends_with("ORDER BY \"created_at\" DESC LIMIT $1"));
}

#[tokio::test]
async fn recommendations_filters_and_offset() {
    let app = build_test_app(MemoryStore::new(table("predictions", recommendations())));
    let res = app
        .get("/api/recommendations?sport=nba&risk_level=low&offset=2&limit=3", Some(&token(42, None)))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["offset"], 2);
    let data = res.body["data"].as_array().unwrap();
    assert!(data.iter().all(|r| r["sport"] == "nba" && r["risk_level"] == "low"));

    let sql = &app.store.statements()[0];
    assert_eq!(sql.params, vec![json!("nba"), json!("low"), json!(3), json!(2)]);
}

#[tokio::test]
async fn subscription_plans_ignore_offset() {
    let app = build_test_app(MemoryStore::new(table(
        "subscription_plans",
        vec![
            json!({ "id": 1, "name": "Monthly", "interval": "month", "status": "active" }),
            json!({ "id": 2, "name": "Annual", "interval": "year", "status": "active" }),
        ],
    )));
    let res = app
        .get("/api/subscription-plans?interval=year&offset=10", Some(&token(42, None)))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["count"], 1);
    assert_eq!(res.body["data"][0]["name"], "Annual");
    assert!(res.body.get("offset").is_none());
    assert!(!app.store.statements()[0].query.contains("OFFSET"));
}

fn prediction_store(saved_by: i64) -> MemoryStore {
    let predictions = table(
        "predictions",
        vec![json!({ "id": 7, "sport": "nba", "pick": "Celtics -3.5", "confidence": 71 })],
    );
    let saved = table("saved_picks", vec![json!({ "user_id": saved_by, "prediction_id": 7 })]);

    MemoryStore::new(move |sql| {
        let mut rows = predictions(sql)?;
        rows.extend(saved(sql)?);
        Ok(rows)
    })
}

#[tokio::test]
async fn prediction_reports_pick_saved_for_caller() {
    let app = build_test_app(prediction_store(42));
    let res = app.get("/api/prediction?id=7", Some(&token(42, None))).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["pick"], "Celtics -3.5");
    assert_eq!(res.body["data"]["pickSaved"], true);

    let statements = app.store.statements();
    assert_eq!(statements.len(), 2);
    assert!(statements[1].query.contains("FROM \"saved_picks\" WHERE \"user_id\" = $1 AND \"prediction_id\" = $2"));
    assert_eq!(statements[1].params, vec![json!(42), json!(7), json!(1)]);
}

#[tokio::test]
async fn prediction_lookup_caps_client_limit() {
    let app = build_test_app(prediction_store(42));
    let res = app.get("/api/prediction?id=7&limit=50", Some(&token(42, None))).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(app.store.statements()[0].params, vec![json!(7), json!(1)]);
}

#[tokio::test]
async fn prediction_saved_by_someone_else_is_not_saved() {
    let app = build_test_app(prediction_store(99));
    let res = app.get("/api/prediction?id=7", Some(&token(42, None))).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["pickSaved"], false);
}

#[tokio::test]
async fn prediction_lookup_errors() {
    let app = build_test_app(prediction_store(42));
    let tok = token(42, None);

    let res = app.get("/api/prediction?id=8", Some(&tok)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body, json!({ "error": "Prediction not found" }));

    let res = app.get("/api/prediction", Some(&tok)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Missing required parameter: id");

    let res = app.get("/api/prediction?id=seven", Some(&tok)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    // only the id=8 lookup reached the store
    assert_eq!(app.store.statements().len(), 1);
}
