use std::collections::HashMap;

use serde::Serialize;

use crate::auth::SubjectId;
use crate::database::Row;
use crate::error::ApiError;
use crate::filter::{Filter, QueryDescriptor};
use crate::state::AppState;

/// Envelope for list endpoints.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub data: Vec<Row>,
    pub count: usize,
    pub limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

/// Run one descriptor-driven read: filters from `params`, optional subject
/// scope, fixed ordering, clamped page.
pub async fn run_list(
    state: &AppState,
    descriptor: &QueryDescriptor,
    subject: Option<SubjectId>,
    params: &HashMap<String, String>,
) -> Result<ListResponse, ApiError> {
    let mut filter = Filter::new(descriptor)?;
    if let Some(subject) = subject {
        filter.scope(subject);
    }
    filter.assign(
        params,
        state.config.filter.max_limit,
        state.config.filter.debug_logging,
    )?;

    let sql = filter.to_sql()?;
    let rows = state.store.fetch_rows(&sql).await?;
    let page = filter.page();

    Ok(ListResponse {
        count: rows.len(),
        data: rows,
        limit: page.limit,
        offset: page.offset,
    })
}

/// Like [`run_list`] for descriptors capped at one row; `None` when nothing matched.
pub async fn run_single(
    state: &AppState,
    descriptor: &QueryDescriptor,
    params: &HashMap<String, String>,
) -> Result<Option<Row>, ApiError> {
    let mut filter = Filter::new(descriptor)?;
    filter.assign(
        params,
        state.config.filter.max_limit,
        state.config.filter.debug_logging,
    )?;
    let sql = filter.to_sql()?;
    Ok(state.store.fetch_optional(&sql).await?)
}
