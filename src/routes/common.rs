//! Common routes: health, readiness, version.

use crate::handlers::common::{health, ready, version};
use crate::state::AppState;
use axum::{routing::get, Router};

/// GET /health, /healthcheck, /ready, /version. Mounted at the root, outside the API prefix.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/healthcheck", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
