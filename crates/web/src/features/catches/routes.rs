use axum::{
    Router, middleware,
    routing::{post, put},
};
use storage::Database;

use super::handlers::{create_catch, update_catch_status};
use crate::middleware::auth::{ApiKeys, require_auth};

/// Catch submission, nested under `/api/contests`
pub fn contest_routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .route("/:code/catches", post(create_catch))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}

/// Moderation, nested under `/api/catches`
pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .route("/:id/status", put(update_catch_status))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
