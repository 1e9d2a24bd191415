use axum::{
    Router, middleware,
    routing::{get, post},
};
use core_tkw::health_check;
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod callback;
pub mod logging_middleware;
pub mod projects;
pub mod requests;
pub mod settings;
pub mod webhook_proxy;

//
// Router
//

/// All routes, with the compiled frontend served out of `static_dir`.
pub fn router(static_dir: &Path) -> Router<AppState> {
    let api_routes = Router::new()
        .route(
            "/api/requests",
            post(requests::post_request).get(requests::get_requests),
        )
        .route("/api/requests/{id}", get(requests::get_request))
        .route("/api/projects", get(projects::get_projects))
        .route("/api/webhook-proxy", post(webhook_proxy::post_webhook_proxy))
        .route("/api/callback", post(callback::post_callback))
        .route("/api/settings", get(settings::get_settings));

    Router::new()
        .route("/health", get(health_check))
        .merge(api_routes)
        // Compiled wasm bundle
        .nest_service("/pkg", ServeDir::new(static_dir.join("pkg")))
        // Everything else gets the single page; it picks its view from the URL hash
        .fallback_service(ServeFile::new(static_dir.join("index.html")))
        .layer(middleware::from_fn(logging_middleware::log_route_access))
        .layer(TraceLayer::new_for_http())
}
