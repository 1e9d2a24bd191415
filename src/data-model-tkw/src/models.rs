use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::SqlType;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::io::Write;
use uuid::Uuid;

use crate::db::PoolError;

// SQL type definition for the custom enum
// Note: snake_case to match the PostgreSQL type name
#[allow(non_camel_case_types)]
#[derive(SqlType, diesel::query_builder::QueryId, Debug, Clone, Copy)]
#[diesel(postgres_type(name = "request_status"))]
pub struct Request_status;

/// Lifecycle status of a generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Request_status)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Sent (or about to be sent) to the automation system, no answer yet
    Pending,
    /// Automation system called back with an output link
    Ready,
    /// Automation system called back with an error message
    Error,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ready => "ready",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl ToSql<Request_status, Pg> for RequestStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Request_status, Pg> for RequestStatus {
    fn from_sql(bytes: PgValue) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"pending" => Ok(RequestStatus::Pending),
            b"ready" => Ok(RequestStatus::Ready),
            b"error" => Ok(RequestStatus::Error),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

// requests table model (database representation)
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GenerationRequest {
    pub id: Uuid,
    pub project_name: String,
    pub business_details: String,
    pub website_structure: String,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// RequestState - ergonomic Rust enum for status + its payload columns
/// Where a request is in its lifecycle, carrying the data that only exists in that state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RequestState {
    Pending,
    Ready { output_link: String },
    Error { error_message: String },
}

impl RequestState {
    pub fn status(&self) -> RequestStatus {
        match self {
            Self::Pending => RequestStatus::Pending,
            Self::Ready { .. } => RequestStatus::Ready,
            Self::Error { .. } => RequestStatus::Error,
        }
    }
}

impl GenerationRequest {
    /// A brand-new pending record for a validated submission.
    pub fn new_pending(id: Uuid, submission: &Submission, now: DateTime<Utc>) -> Self {
        Self::from_state(
            id,
            submission.project_name.clone(),
            submission.business_details.clone(),
            submission.website_structure.clone(),
            RequestState::Pending,
            now,
        )
    }

    /// Create database representation from ergonomic RequestState enum
    pub fn from_state(
        id: Uuid,
        project_name: String,
        business_details: String,
        website_structure: String,
        state: RequestState,
        created_at: DateTime<Utc>,
    ) -> Self {
        let change = StateChange::new(state, created_at);
        GenerationRequest {
            id,
            project_name,
            business_details,
            website_structure,
            status: change.status,
            output_link: change.output_link,
            error_message: change.error_message,
            created_at,
            updated_at: change.updated_at,
        }
    }

    /// Convert database representation to ergonomic RequestState enum
    pub fn state(&self) -> RequestState {
        match self.status {
            RequestStatus::Pending => RequestState::Pending,
            RequestStatus::Ready => RequestState::Ready {
                output_link: self.output_link.clone().unwrap_or_default(),
            },
            RequestStatus::Error => RequestState::Error {
                error_message: self.error_message.clone().unwrap_or_default(),
            },
        }
    }
}

/// Column values written on every status transition.
///
/// `output_link` and `error_message` are always written together with `status`,
/// so a transition also clears whatever the previous state stored.
#[derive(Debug, Clone, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = crate::schema::requests)]
#[diesel(treat_none_as_null = true)]
pub struct StateChange {
    pub status: RequestStatus,
    pub output_link: Option<String>,
    pub error_message: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl StateChange {
    pub fn new(state: RequestState, updated_at: DateTime<Utc>) -> Self {
        match state {
            RequestState::Pending => StateChange {
                status: RequestStatus::Pending,
                output_link: None,
                error_message: None,
                updated_at,
            },
            RequestState::Ready { output_link } => StateChange {
                status: RequestStatus::Ready,
                output_link: Some(output_link),
                error_message: None,
                updated_at,
            },
            RequestState::Error { error_message } => StateChange {
                status: RequestStatus::Error,
                output_link: None,
                error_message: Some(error_message),
                updated_at,
            },
        }
    }
}

/// Changes applied when a project name is submitted again: new structure, back to pending.
/// `created_at` and `business_details` are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = crate::schema::requests)]
#[diesel(treat_none_as_null = true)]
pub struct Resubmission {
    pub website_structure: String,
    pub status: RequestStatus,
    pub output_link: Option<String>,
    pub error_message: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Resubmission {
    pub fn new(website_structure: String, now: DateTime<Utc>) -> Self {
        let reset = StateChange::new(RequestState::Pending, now);
        Resubmission {
            website_structure,
            status: reset.status,
            output_link: reset.output_link,
            error_message: reset.error_message,
            updated_at: reset.updated_at,
        }
    }
}

// API Payload Types

/// Input payload for POST /api/requests. Missing fields deserialize as empty and fail validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPayload {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub business_details: String,
    #[serde(default)]
    pub website_structure: String,
}

/// A submission whose fields are trimmed and known to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub project_name: String,
    pub business_details: String,
    pub website_structure: String,
}

impl TryFrom<SubmitPayload> for Submission {
    type Error = SubmitError;

    fn try_from(payload: SubmitPayload) -> Result<Self, Self::Error> {
        let project_name = payload.project_name.trim();
        let business_details = payload.business_details.trim();
        let website_structure = payload.website_structure.trim();

        let missing: Vec<&str> = [
            ("Project Name", project_name),
            ("Business Details", business_details),
            ("Website Structure", website_structure),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(label, _)| label)
        .collect();

        if !missing.is_empty() {
            return Err(SubmitError::InvalidInput(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        Ok(Submission {
            project_name: project_name.to_string(),
            business_details: business_details.to_string(),
            website_structure: website_structure.to_string(),
        })
    }
}

/// Body POSTed to the automation webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchPayload {
    pub id: Uuid,
    pub project_name: String,
    pub business_details: String,
    pub website_structure: String,
    pub callback_url: String,
}

impl DispatchPayload {
    pub fn new(id: Uuid, submission: &Submission, callback_url: &str) -> Self {
        DispatchPayload {
            id,
            project_name: submission.project_name.clone(),
            business_details: submission.business_details.clone(),
            website_structure: submission.website_structure.clone(),
            callback_url: callback_url.to_string(),
        }
    }
}

/// Response payload for POST /api/requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub id: Uuid,
    /// True when an existing record with the same project name was reset and reused.
    pub reused: bool,
    /// Whatever JSON the automation system answered with.
    pub automation: Value,
}

/// Optional free-text filter for the list endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: Option<String>,
}

/// Response payload for GET /api/requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestListResponse {
    pub items: Vec<GenerationRequest>,
}

/// One reusable project as offered by the project picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub project_name: String,
    pub business_details: String,
    pub website_structure: String,
}

impl From<GenerationRequest> for ProjectSummary {
    fn from(request: GenerationRequest) -> Self {
        ProjectSummary {
            id: request.id,
            project_name: request.project_name,
            business_details: request.business_details,
            website_structure: request.website_structure,
        }
    }
}

/// Response payload for GET /api/settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsResponse {
    /// The URL sent to the automation system as `callbackUrl`.
    pub callback_url: String,
}

/// Response payload for GET /api/projects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectListResponse {
    pub items: Vec<ProjectSummary>,
}

// Callback

/// A validated callback from the automation system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackUpdate {
    /// Raw id as sent. It is only ever compared against stored ids.
    pub id: String,
    pub state: RequestState,
}

/// JavaScript truthiness, which is what automation workflows tend to assume.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl TryFrom<Value> for CallbackUpdate {
    type Error = CallbackError;

    fn try_from(body: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut fields) = body else {
            return Err(CallbackError::InvalidBody);
        };

        let id = match fields.remove("id") {
            Some(Value::String(id)) if !id.is_empty() => id,
            _ => return Err(CallbackError::InvalidId),
        };

        // A truthy `error` wins over `outputLink`
        let error = fields.remove("error").unwrap_or(Value::Null);
        if is_truthy(&error) {
            return match error {
                Value::String(error_message) => Ok(CallbackUpdate {
                    id,
                    state: RequestState::Error { error_message },
                }),
                _ => Err(CallbackError::InvalidErrorMessage),
            };
        }

        match fields.remove("outputLink") {
            Some(Value::String(output_link)) if !output_link.is_empty() => Ok(CallbackUpdate {
                id,
                state: RequestState::Ready { output_link },
            }),
            _ => Err(CallbackError::InvalidOutputLink),
        }
    }
}

/// Response payload for POST /api/callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CallbackResponse {
    pub fn ok() -> Self {
        CallbackResponse { ok: true, message: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        CallbackResponse {
            ok: false,
            message: Some(message.into()),
        }
    }
}

// API Error Types

/// Error for POST /api/requests endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum SubmitError {
    /// A required field was empty after trimming
    #[serde(rename = "invalid_input")]
    InvalidInput(String),
    /// Lookup, insert or update of the record failed
    #[serde(rename = "store")]
    Store(String),
    /// The automation system could not be reached
    #[serde(rename = "network")]
    Network(String),
    /// The automation system answered with a non-success status
    #[serde(rename = "service")]
    Service { status: u16, message: String },
    /// Unknown error occurred
    #[serde(rename = "unknown")]
    Unknown(String),
}

/// Error for GET /api/requests/{id} endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum RequestLookupError {
    /// The provided id is not a valid UUID
    #[serde(rename = "invalid_id")]
    InvalidId,
    /// The id was not found in the database
    #[serde(rename = "unknown_id")]
    UnknownId,
    /// Unknown error occurred
    #[serde(rename = "unknown")]
    Unknown(String),
}

/// Error for POST /api/callback endpoint. Rendered as a `CallbackResponse`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallbackError {
    #[error("Invalid callback body")]
    InvalidBody,
    #[error("Invalid or missing id")]
    InvalidId,
    #[error("Invalid error message")]
    InvalidErrorMessage,
    #[error("Invalid or missing outputLink")]
    InvalidOutputLink,
    /// Holds the underlying cause for logging; the client only sees a fixed message.
    #[error("Failed to update request")]
    Store(String),
}

pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": self.0.to_string()
            })),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

macro_rules! from_error {
    ($lib_err:path, $err_type:tt, $variant:ident) => {
        /// Converts a `$lib_err` into an `$err_type::$variant` holding its debug description.
        impl From<$lib_err> for $err_type {
            fn from(e: $lib_err) -> Self {
                $err_type::$variant(format!("{:?}", e))
            }
        }
    };
}

// SubmitError

impl IntoResponse for SubmitError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            SubmitError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SubmitError::Network(_) => StatusCode::BAD_GATEWAY,
            SubmitError::Service { status, .. } => StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            SubmitError::Store(_) | SubmitError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

from_error!(PoolError, SubmitError, Store);
from_error!(diesel::result::Error, SubmitError, Store);

// RequestLookupError

impl IntoResponse for RequestLookupError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            RequestLookupError::InvalidId => StatusCode::BAD_REQUEST,
            RequestLookupError::UnknownId => StatusCode::NOT_FOUND,
            RequestLookupError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

from_error!(PoolError, RequestLookupError, Unknown);

impl From<diesel::result::Error> for RequestLookupError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => RequestLookupError::UnknownId,
            _ => RequestLookupError::Unknown(err.to_string()),
        }
    }
}

// CallbackError

impl IntoResponse for CallbackError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            CallbackError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        (status, Json(CallbackResponse::failure(self.to_string()))).into_response()
    }
}

from_error!(PoolError, CallbackError, Store);
from_error!(diesel::result::Error, CallbackError, Store);
