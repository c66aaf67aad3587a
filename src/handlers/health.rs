use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Sharpline API",
        "version": version,
        "endpoints": {
            "health": "/health (public)",
            "recommendations": "/api/recommendations (bearer)",
            "tracker": "/api/tracker (bearer)",
            "subscription_plans": "/api/subscription-plans (bearer)",
            "prediction": "/api/prediction?id= (bearer)",
            "user_status": "/api/user-status?userId= (bearer, admin)",
            "verify_email": "/api/verify-email?token= (public)",
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now, "database": "ok" })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "timestamp": now, "database": "unavailable" })),
            )
        }
    }
}
