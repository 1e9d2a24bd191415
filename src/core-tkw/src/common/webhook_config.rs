use std::net::SocketAddr;

use url::Url;

/// Where generation requests are sent, and where the automation system should send results back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    pub automation_url: Url,
    pub callback_url: Url,
}

#[derive(Debug, thiserror::Error)]
pub enum WebhookConfigError {
    #[error("AUTOMATION_WEBHOOK_URL environment variable is required")]
    MissingAutomationUrl,
    #[error("{name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, WebhookConfigError> {
    Url::parse(value.trim()).map_err(|source| WebhookConfigError::InvalidUrl { name, source })
}

/// Builds the webhook configuration from AUTOMATION_WEBHOOK_URL and CALLBACK_URL.
///
/// Without CALLBACK_URL the callback route of this server (`api_addr`) is used, which is
/// only reachable by automation systems on the same network.
pub fn webhook_config(api_addr: SocketAddr, tls: bool) -> Result<WebhookConfig, WebhookConfigError> {
    let automation = std::env::var("AUTOMATION_WEBHOOK_URL").map_err(|_| WebhookConfigError::MissingAutomationUrl)?;
    let callback = std::env::var("CALLBACK_URL").ok();
    build_webhook_config(&automation, callback.as_deref(), api_addr, tls)
}

fn build_webhook_config(
    automation: &str,
    callback: Option<&str>,
    api_addr: SocketAddr,
    tls: bool,
) -> Result<WebhookConfig, WebhookConfigError> {
    let automation_url = parse_url("AUTOMATION_WEBHOOK_URL", automation)?;
    let callback_url = match callback {
        Some(callback) => parse_url("CALLBACK_URL", callback)?,
        None => {
            let scheme = if tls { "https" } else { "http" };
            parse_url("CALLBACK_URL", &format!("{}://{}/api/callback", scheme, api_addr))?
        }
    };
    Ok(WebhookConfig {
        automation_url,
        callback_url,
    })
}

/// Same as webhook_config but panics on error.
pub fn get_webhook_config(api_addr: SocketAddr, tls: bool) -> WebhookConfig {
    webhook_config(api_addr, tls).unwrap_or_else(|e| panic!("Invalid webhook configuration: {}", e))
}
