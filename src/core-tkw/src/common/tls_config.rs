use axum_server::tls_rustls::RustlsConfig;
use std::path::PathBuf;

use super::env_flag::env_flag;

/// True if ENABLE_TLS is set to a truthy value.
pub fn is_tls_enabled() -> bool {
    env_flag("ENABLE_TLS")
}

/// Reads a file path from `var`, panicking if it is unset or points at nothing.
fn required_existing_path(var: &str) -> PathBuf {
    let path = std::env::var(var)
        .map(PathBuf::from)
        .unwrap_or_else(|_| panic!("{} environment variable is required when ENABLE_TLS=true.", var));
    if !path.exists() {
        panic!("{} points to a file that does not exist: {}", var, path.display());
    }
    path
}

/// Get TLS configuration from TLS_CERT_PATH and TLS_KEY_PATH (PEM files).
/// Panics if required configuration is missing or invalid
pub async fn get_tls_config() -> RustlsConfig {
    let cert_path = required_existing_path("TLS_CERT_PATH");
    let key_path = required_existing_path("TLS_KEY_PATH");

    RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .expect("Failed to load TLS certificate and key")
}
