//! Client for the external workflow-automation webhook that generates the copy.
//!
//! Requests are relayed as-is: no retries, no timeout beyond the HTTP client's default,
//! no validation of what is sent.

use data_model_tkw::models::SubmitError;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum AutomationError {
    /// The webhook could not be reached, or its answer could not be read.
    #[error("Automation webhook unreachable: {0}")]
    Network(#[from] reqwest::Error),

    /// The webhook answered with a non-success status.
    #[error("Automation request failed: {status}")]
    Service { status: u16 },

    #[error("Failed to encode automation request: {0}")]
    Encode(#[from] serde_json::Error),

    /// The webhook answered with a success status but its body is not JSON.
    #[error("Automation answer is not JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct AutomationClient {
    http: reqwest::Client,
    webhook_url: Url,
}

impl AutomationClient {
    pub fn new(http: reqwest::Client, webhook_url: Url) -> Self {
        Self { http, webhook_url }
    }

    /// POSTs `body` as JSON to the webhook and returns its JSON answer.
    ///
    /// A success answer whose body is empty or not JSON is an [`AutomationError::Decode`].
    pub async fn forward<T: Serialize + ?Sized>(&self, body: &T) -> Result<Value, AutomationError> {
        let bytes = serde_json::to_vec(body)?;
        self.forward_raw(bytes).await
    }

    /// Same as [`forward`](Self::forward) for a body that is already encoded JSON, sent byte for byte.
    pub async fn forward_raw(&self, body: Vec<u8>) -> Result<Value, AutomationError> {
        let response = self
            .http
            .post(self.webhook_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status.as_u16(),
                body = %text,
                "Automation webhook rejected request"
            );
            return Err(AutomationError::Service {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(AutomationError::Decode)
    }
}

impl From<AutomationError> for SubmitError {
    fn from(error: AutomationError) -> Self {
        match error {
            AutomationError::Network(_) => SubmitError::Network(error.to_string()),
            AutomationError::Service { status } => SubmitError::Service {
                status,
                message: error.to_string(),
            },
            AutomationError::Encode(_) | AutomationError::Decode(_) => SubmitError::Unknown(error.to_string()),
        }
    }
}
