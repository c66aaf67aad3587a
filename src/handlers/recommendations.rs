use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::ApiError;
use crate::filter::{AllowedFilter, QueryDescriptor};
use crate::middleware::AuthUser;
use crate::state::AppState;

use super::query::{run_list, ListResponse};

pub const RECOMMENDATIONS: QueryDescriptor = QueryDescriptor {
    relation: "predictions",
    columns: &[
        "id",
        "sport",
        "league",
        "event_name",
        "event_time",
        "pick",
        "odds",
        "confidence",
        "risk_level",
        "status",
        "analysis",
        "created_at",
    ],
    scope_column: None,
    filters: &[
        AllowedFilter::text("status", "status"),
        AllowedFilter::text("sport", "sport"),
        AllowedFilter::text("risk_level", "risk_level"),
    ],
    sort_column: "created_at",
    default_limit: 9,
    max_limit: None,
    allow_offset: true,
};

/// GET /api/recommendations - latest model picks, newest first
pub async fn recommendations_get(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResponse>, ApiError> {
    let list = run_list(&state, &RECOMMENDATIONS, None, &params).await?;
    tracing::debug!(subject = user.subject, count = list.count, "recommendations listed");
    Ok(Json(list))
}
