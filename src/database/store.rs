use std::time::Instant;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{postgres::PgArguments, Row as _};

use super::manager::{DatabaseError, PgStore};
use crate::filter::SqlResult;

/// One result row: column name to JSON value.
pub type Row = Map<String, Value>;

/// Executes statements that yield a single JSON column named `row`.
///
/// Handlers only see this trait, so tests can swap Postgres for an in-memory
/// recorder.
#[async_trait]
pub trait RowStore: Send + Sync {
    async fn fetch_rows(&self, sql: &SqlResult) -> Result<Vec<Row>, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;

    async fn fetch_optional(&self, sql: &SqlResult) -> Result<Option<Row>, DatabaseError> {
        Ok(self.fetch_rows(sql).await?.into_iter().next())
    }
}

#[async_trait]
impl RowStore for PgStore {
    async fn fetch_rows(&self, sql: &SqlResult) -> Result<Vec<Row>, DatabaseError> {
        if self.query_logging() {
            tracing::debug!(query = %sql.query, params = sql.params.len(), "executing statement");
        }

        let started = Instant::now();
        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = bind_param(q, p);
        }
        let rows = q.fetch_all(self.pool()).await?;

        let elapsed = started.elapsed();
        if elapsed > self.slow_query_threshold() {
            tracing::warn!(query = %sql.query, elapsed_ms = elapsed.as_millis() as u64, "slow query");
        }

        rows.iter()
            .map(|r| match r.try_get::<Value, _>("row")? {
                Value::Object(map) => Ok(map),
                other => Err(DatabaseError::UnexpectedRow(format!("expected object, got {}", other))),
            })
            .collect()
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.health_check().await
    }
}

fn bind_param<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        // JSONB
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()),
    }
}
