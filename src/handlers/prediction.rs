use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::auth::SubjectId;
use crate::error::ApiError;
use crate::filter::{AllowedFilter, FilterOp, Page, QueryDescriptor, SqlBuilder};
use crate::middleware::AuthUser;
use crate::state::AppState;

use super::query::run_single;

pub const PREDICTION: QueryDescriptor = QueryDescriptor {
    relation: "predictions",
    columns: &["*"],
    scope_column: None,
    filters: &[AllowedFilter::integer("id", "id").required()],
    sort_column: "created_at",
    default_limit: 1,
    max_limit: Some(1),
    allow_offset: false,
};

/// GET /api/prediction?id= - one prediction plus whether the caller saved it
pub async fn prediction_get(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let mut row = run_single(&state, &PREDICTION, &params)
        .await?
        .ok_or_else(|| ApiError::not_found("Prediction not found"))?;

    let prediction_id = row
        .get("id")
        .cloned()
        .ok_or_else(|| ApiError::not_found("Prediction not found"))?;

    let saved = pick_saved(&state, user.subject, prediction_id).await?;
    row.insert("pickSaved".to_string(), Value::Bool(saved));

    Ok(Json(json!({ "data": row })))
}

/// Saved-pick lookup, scoped to the same subject that authenticated.
async fn pick_saved(state: &AppState, subject: SubjectId, prediction_id: Value) -> Result<bool, ApiError> {
    let mut builder = SqlBuilder::select("saved_picks", &["prediction_id"]);
    builder
        .add_filter("user_id", FilterOp::Eq, subject)
        .add_filter("prediction_id", FilterOp::Eq, prediction_id)
        .paginate(Page { limit: 1, offset: None });

    let rows = state.store.fetch_rows(&builder.build()).await?;
    Ok(!rows.is_empty())
}
