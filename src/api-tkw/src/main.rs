use core_tkw::{
    AutomationClient, get_api_base_url, get_db_pool, get_static_dir, get_tls_config, get_webhook_config,
    is_tls_enabled, setup_logging,
};

use api_tkw::{routes, state::AppState};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    setup_logging("api_tkw=debug,core_tkw=debug,tower_http=debug");

    let addr = get_api_base_url().expect("Invalid HOST or PORT");
    let tls = is_tls_enabled();

    let webhook = get_webhook_config(addr, tls);
    tracing::info!(
        automation_url = %webhook.automation_url,
        callback_url = %webhook.callback_url,
        "Automation webhook configured"
    );

    let pool = get_db_pool().await;
    let automation = AutomationClient::new(reqwest::Client::new(), webhook.automation_url);
    let state = AppState::new(pool, automation, webhook.callback_url);

    let static_dir = get_static_dir();
    tracing::info!("Serving frontend from {}", static_dir.display());
    let app = routes::router(&static_dir).with_state(state);

    if tls {
        // Both ring and aws-lc-rs can end up linked; pick one explicitly
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let config = get_tls_config().await;

        tracing::info!("Listening on https://{}", addr);
        axum_server::bind_rustls(addr, config)
            .serve(app.into_make_service())
            .await
            .expect("Server error");
    } else {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .unwrap_or_else(|e| panic!("Failed to bind to address {}: {}", addr, e));

        tracing::info!("Listening on http://{}", addr);
        axum::serve(listener, app).await.expect("Server error");
    }
}
