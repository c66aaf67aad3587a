use std::collections::HashMap;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::filter::SqlResult;
use crate::services::EmailMessage;
use crate::state::AppState;

/// Flip the flag and clear the token in one statement. The guard doubles as
/// the lookup, so an unknown or already-used token matches zero rows.
const VERIFY_EMAIL_SQL: &str = r#"
    WITH updated AS (
        UPDATE "users"
        SET "email_verified" = TRUE, "email_verification_token" = NULL
        WHERE "email_verification_token" = $1
        AND "email_verified" = FALSE
        RETURNING "id", "email"
    )
    SELECT row_to_json(updated) AS row FROM updated
"#;

/// GET /api/verify-email?token= - confirm an address from the emailed link
///
/// The token is the credential here, so there is no bearer check. The welcome
/// email is attempted after the update commits and bounded by
/// `email.timeout_secs`; its outcome is reported in the body but never
/// changes the status code.
pub async fn verify_email_get(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let token = params
        .get("token")
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Verification token is required"))?;

    let sql = SqlResult {
        query: VERIFY_EMAIL_SQL.to_string(),
        params: vec![Value::from(token)],
    };

    let row = state
        .store
        .fetch_optional(&sql)
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid or expired verification token"))?;

    tracing::info!(user_id = ?row.get("id"), "email verified");

    let welcome_sent = match row.get("email").and_then(Value::as_str) {
        Some(email) => {
            let message = EmailMessage::welcome(email, &state.config.email.app_url);
            let limit = Duration::from_secs(state.config.email.timeout_secs);
            match tokio::time::timeout(limit, state.mailer.send(&message)).await {
                Ok(Ok(())) => true,
                Ok(Err(e)) => {
                    tracing::warn!(user_id = ?row.get("id"), "welcome email failed: {}", e);
                    false
                }
                Err(_) => {
                    tracing::warn!(user_id = ?row.get("id"), "welcome email timed out after {:?}", limit);
                    false
                }
            }
        }
        None => false,
    };

    Ok(Json(json!({
        "message": "Email verified successfully",
        "welcomeEmailSent": welcome_sent,
    })))
}
