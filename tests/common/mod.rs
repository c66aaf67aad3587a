#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use sharpline_api::auth::{Claims, SubjectId, TokenVerifier};
use sharpline_api::config::AppConfig;
use sharpline_api::database::{DatabaseError, Row, RowStore};
use sharpline_api::filter::SqlResult;
use sharpline_api::services::{EmailMessage, MailError, Mailer};
use sharpline_api::{router, AppState};

pub const SECRET: &str = "integration-test-secret-0123456789";

type Responder = Box<dyn Fn(&SqlResult) -> Result<Vec<Row>, DatabaseError> + Send + Sync>;

/// Records every statement and answers through a responder closure.
pub struct MemoryStore {
    statements: Mutex<Vec<SqlResult>>,
    responder: Responder,
    healthy: AtomicBool,
}

impl MemoryStore {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&SqlResult) -> Result<Vec<Row>, DatabaseError> + Send + Sync + 'static,
    {
        Self {
            statements: Mutex::new(vec![]),
            responder: Box::new(responder),
            healthy: AtomicBool::new(true),
        }
    }

    pub fn empty() -> Self {
        Self::new(|_| Ok(vec![]))
    }

    pub fn failing() -> Self {
        Self::new(|_| Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)))
    }

    pub fn statements(&self) -> Vec<SqlResult> {
        self.statements.lock().unwrap().clone()
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn fetch_rows(&self, sql: &SqlResult) -> Result<Vec<Row>, DatabaseError> {
        self.statements.lock().unwrap().push(sql.clone());
        (self.responder)(sql)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DatabaseError::Sqlx(sqlx::Error::PoolClosed))
        }
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        let mailer = Self::default();
        mailer.fail.store(true, Ordering::SeqCst);
        mailer
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::Rejected(502));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub struct StalledMailer;

#[async_trait]
impl Mailer for StalledMailer {
    async fn send(&self, _message: &EmailMessage) -> Result<(), MailError> {
        std::future::pending().await
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub fn build_test_app(store: MemoryStore) -> TestApp {
    build_test_app_with(store, RecordingMailer::default())
}

pub fn build_test_app_with(store: MemoryStore, mailer: RecordingMailer) -> TestApp {
    let store = Arc::new(store);
    let mailer = Arc::new(mailer);
    TestApp { router: test_router(store.clone(), mailer.clone()), store, mailer }
}

/// App whose mailer never completes a send; `mailer` records nothing.
pub fn build_test_app_with_stalled_mailer(store: MemoryStore) -> TestApp {
    let store = Arc::new(store);
    TestApp {
        router: test_router(store.clone(), Arc::new(StalledMailer)),
        store,
        mailer: Arc::new(RecordingMailer::default()),
    }
}

fn test_router(store: Arc<MemoryStore>, mailer: Arc<dyn Mailer>) -> Router {
    let config = AppConfig::for_tests(SECRET);
    let verifier = TokenVerifier::new(SECRET).unwrap();
    router(AppState::new(config, store, verifier, mailer))
}

impl TestApp {
    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token).await
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        TestResponse { status, headers, body }
    }
}

pub fn token(sub: SubjectId, role: Option<&str>) -> String {
    TokenVerifier::new(SECRET)
        .unwrap()
        .issue(&Claims::new(sub, role.map(str::to_string), chrono::Duration::hours(1)))
        .unwrap()
}

pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture row must be an object, got {}", other),
    }
}

/// Answers statements against `relation` by applying their equality filters
/// and LIMIT/OFFSET to a fixed row set. Other relations get no rows.
pub fn table(
    relation: &'static str,
    rows: Vec<Value>,
) -> impl Fn(&SqlResult) -> Result<Vec<Row>, DatabaseError> + Send + Sync + 'static {
    move |sql: &SqlResult| {
        if !sql.query.contains(&format!("FROM \"{}\"", relation)) {
            return Ok(vec![]);
        }

        let filters = equality_filters(&sql.query);
        let matched = rows.iter().filter(|r| {
            filters
                .iter()
                .all(|(col, idx)| r.get(col.as_str()) == sql.params.get(idx - 1))
        });

        let offset = placeholder_after(&sql.query, "OFFSET $")
            .and_then(|i| sql.params.get(i - 1))
            .and_then(Value::as_i64)
            .unwrap_or(0) as usize;
        let limit = placeholder_after(&sql.query, "LIMIT $")
            .and_then(|i| sql.params.get(i - 1))
            .and_then(Value::as_i64)
            .map(|l| l as usize)
            .unwrap_or(usize::MAX);

        Ok(matched.skip(offset).take(limit).cloned().map(row).collect())
    }
}

fn equality_filters(query: &str) -> Vec<(String, usize)> {
    let Some((_, rest)) = query.split_once("WHERE ") else {
        return vec![];
    };
    let clause = rest.split(" ORDER BY").next().unwrap_or(rest);
    clause
        .split(" AND ")
        .filter_map(|part| {
            let (col, placeholder) = part.split_once(" = $")?;
            let idx = placeholder.trim().parse().ok()?;
            Some((col.trim().trim_matches('"').to_string(), idx))
        })
        .collect()
}

fn placeholder_after(query: &str, marker: &str) -> Option<usize> {
    let (_, rest) = query.split_once(marker)?;
    rest.split_whitespace().next()?.parse().ok()
}

pub fn tracked_picks() -> Vec<Value> {
    let mut rows = vec![];
    for id in 1..=40 {
        let user_id = if id % 3 == 0 { 7 } else { 42 };
        let status = if id % 2 == 0 { "hit" } else { "miss" };
        let sport = if id % 4 == 0 { "nfl" } else { "nba" };
        rows.push(json!({
            "id": id,
            "user_id": user_id,
            "prediction_id": 100 + id,
            "sport": sport,
            "status": status,
            "created_at": format!("2026-02-{:02}T{:02}:00:00Z", 1 + (40 - id) / 24, (40 - id) % 24),
        }));
    }
    rows
}
