//! Tracing setup and per-request ids.

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// `RUST_LOG` if set, otherwise `default_filter`.
pub fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install the global fmt subscriber. Load `.env` first.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .init();
}

/// Reuse an incoming `x-request-id` or mint one, run the request inside a span
/// carrying it, and echo it on the response.
pub async fn request_id_middleware(request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let span = tracing::info_span!(
        "http.request",
        request_id = %request_id,
        method = %request.method(),
        route = %request.uri().path(),
    );

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_dotenv_from;
    use std::io::Write;
    use std::path::Path;

    #[test]
    fn rust_log_from_dotenv_reaches_filter() {
        let preset = std::env::var("RUST_LOG").ok();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "RUST_LOG=student_service=trace").unwrap();

        assert_eq!(
            load_dotenv_from(file.path()).as_deref(),
            Some(file.path())
        );
        let expected = preset.unwrap_or_else(|| "student_service=trace".into());
        assert_eq!(
            env_filter("warn").to_string(),
            EnvFilter::new(expected).to_string()
        );
    }

    #[test]
    fn missing_dotenv_is_not_an_error() {
        assert!(load_dotenv_from(Path::new("/nonexistent/.env")).is_none());
    }
}
