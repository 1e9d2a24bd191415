use axum::{
    body::Bytes,
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::IgnoredAny;
use serde_json::{Value, json};

use core_tkw::{AutomationClient, AutomationError};

/// Failure of the relay. The body is always `{"error": <display>}`.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The automation system answered with this non-success status; it is passed through.
    #[error("Automation request failed: {0}")]
    Upstream(u16),
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match self {
            ProxyError::Upstream(status) => StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            ProxyError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<AutomationError> for ProxyError {
    fn from(error: AutomationError) -> Self {
        match error {
            AutomationError::Service { status } => ProxyError::Upstream(status),
            AutomationError::Network(_) | AutomationError::Encode(_) | AutomationError::Decode(_) => ProxyError::Internal,
        }
    }
}

/// POST /api/webhook-proxy - Relay a JSON body to the automation webhook and return its answer
///
/// Nothing is stored. The body must be JSON but is otherwise forwarded byte for byte.
pub async fn post_webhook_proxy(
    State(automation): State<AutomationClient>,
    body: Bytes,
) -> Result<Json<Value>, ProxyError> {
    if let Err(e) = serde_json::from_slice::<IgnoredAny>(&body) {
        tracing::error!(error = %e, "Webhook proxy received a body that is not JSON");
        return Err(ProxyError::Internal);
    }

    let answer = automation.forward_raw(body.to_vec()).await.map_err(|e| {
        tracing::error!(error = %e, "Webhook proxy call failed");
        ProxyError::from(e)
    })?;

    Ok(Json(answer))
}
