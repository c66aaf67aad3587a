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

pub const TRACKER: QueryDescriptor = QueryDescriptor {
    relation: "tracked_picks",
    columns: &[
        "id",
        "user_id",
        "prediction_id",
        "sport",
        "pick",
        "odds",
        "stake",
        "status",
        "profit",
        "created_at",
    ],
    scope_column: Some("user_id"),
    filters: &[
        AllowedFilter::text("status", "status"),
        AllowedFilter::text("sport", "sport"),
    ],
    sort_column: "created_at",
    default_limit: 20,
    max_limit: None,
    allow_offset: true,
};

/// GET /api/tracker - the caller's tracked bets
///
/// Always scoped to the token subject; a `userId` in the query string is ignored.
pub async fn tracker_get(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResponse>, ApiError> {
    let list = run_list(&state, &TRACKER, Some(user.subject), &params).await?;
    Ok(Json(list))
}
