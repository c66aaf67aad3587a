use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{self, method_not_allowed};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    Router::new()
        // Public
        .route("/", get(handlers::root).fallback(method_not_allowed))
        .route("/health", get(handlers::health).fallback(method_not_allowed))
        .merge(cross_origin_routes().layer(cors))
        .merge(same_origin_routes())
        .fallback(handlers::not_found)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Routes the web client calls directly from the browser.
fn cross_origin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/recommendations",
            get(handlers::recommendations_get).fallback(method_not_allowed),
        )
        .route("/api/tracker", get(handlers::tracker_get).fallback(method_not_allowed))
        .route(
            "/api/subscription-plans",
            get(handlers::subscription_plans_get).fallback(method_not_allowed),
        )
        .route("/api/prediction", get(handlers::prediction_get).fallback(method_not_allowed))
}

fn same_origin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/user-status", get(handlers::user_status_get).fallback(method_not_allowed))
        .route("/api/verify-email", get(handlers::verify_email_get).fallback(method_not_allowed))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origin = if security.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = security
            .cors_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", o);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
