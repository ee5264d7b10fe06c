//! Router assembly.

mod common;
mod students;

pub use common::common_routes;
pub use students::student_routes;

use crate::config::HttpConfig;
use crate::handlers::common::not_found;
use crate::state::AppState;
use crate::error::json_error_bodies;
use crate::telemetry::request_id_middleware;
use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Full application: operational routes at the root, student routes under
/// `http.api_prefix`, JSON 404 fallback, and the request middleware stack.
/// The body limit sits outside the timeout: `Timeout` needs a `Default` response body.
pub fn app(state: AppState, http: &HttpConfig) -> Router {
    let api = student_routes(state.clone());
    let router = Router::new().merge(common_routes(state));
    let router = if http.api_prefix.is_empty() {
        router.merge(api)
    } else {
        router.nest(&http.api_prefix, api)
    };

    router.fallback(not_found).layer(
        ServiceBuilder::new()
            .layer(middleware::map_response(json_error_bodies))
            .layer(middleware::from_fn(request_id_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(RequestBodyLimitLayer::new(http.max_body_bytes))
            .layer(TimeoutLayer::new(http.request_timeout)),
    )
}
