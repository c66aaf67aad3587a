use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::filter::{AllowedFilter, QueryDescriptor};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

use super::query::run_single;

pub const USER_STATUS: QueryDescriptor = QueryDescriptor {
    relation: "users",
    columns: &[
        "id",
        "email",
        "email_verified",
        "role",
        "subscription_status",
        "subscription_plan",
        "subscription_expires_at",
        "created_at",
    ],
    scope_column: None,
    filters: &[AllowedFilter::integer("userId", "id").required()],
    sort_column: "created_at",
    default_limit: 1,
    max_limit: Some(1),
    allow_offset: false,
};

/// GET /api/user-status?userId= - account and subscription state (admin only)
///
/// The target comes from `userId`; authorization rests on the token role alone.
pub async fn user_status_get(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let row = run_single(&state, &USER_STATUS, &params)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    tracing::info!(admin = admin.subject, target = ?row.get("id"), "user status read");
    Ok(Json(json!({ "data": row })))
}
