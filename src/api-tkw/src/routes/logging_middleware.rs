use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Logs one line per request: info for success and redirects, warn for client errors, error for server errors.
pub async fn log_route_access(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis();

    if response.status().is_server_error() {
        tracing::error!(%method, %path, status, duration_ms = %elapsed_ms, "route access");
    } else if response.status().is_client_error() {
        tracing::warn!(%method, %path, status, duration_ms = %elapsed_ms, "route access");
    } else {
        tracing::info!(%method, %path, status, duration_ms = %elapsed_ms, "route access");
    }

    response
}
