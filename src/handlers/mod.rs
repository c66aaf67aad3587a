// Request handlers. Each read handler is a query descriptor plus a thin
// function composing the auth extractor with `query::run_list`/`run_single`.

pub mod health;
pub mod prediction;
pub mod query;
pub mod recommendations;
pub mod subscription_plans;
pub mod tracker;
pub mod user_status;
pub mod verify_email;

pub use health::{health, root};
pub use prediction::prediction_get;
pub use recommendations::recommendations_get;
pub use subscription_plans::subscription_plans_get;
pub use tracker::tracker_get;
pub use user_status::user_status_get;
pub use verify_email::verify_email_get;

use crate::error::ApiError;

/// Method fallback for every route; runs before any extractor.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
