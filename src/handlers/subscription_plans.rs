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

pub const SUBSCRIPTION_PLANS: QueryDescriptor = QueryDescriptor {
    relation: "subscription_plans",
    columns: &[
        "id",
        "name",
        "description",
        "price_cents",
        "currency",
        "interval",
        "features",
        "status",
        "created_at",
    ],
    scope_column: None,
    filters: &[
        AllowedFilter::text("status", "status"),
        AllowedFilter::text("interval", "interval"),
    ],
    sort_column: "created_at",
    default_limit: 20,
    max_limit: None,
    allow_offset: false,
};

/// GET /api/subscription-plans
pub async fn subscription_plans_get(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResponse>, ApiError> {
    Ok(Json(run_list(&state, &SUBSCRIPTION_PLANS, None, &params).await?))
}
