use axum::{
    body::Bytes,
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde_json::Value;
use uuid::Uuid;

use data_model_tkw::db::DbPool;
use data_model_tkw::models::{CallbackError, CallbackResponse, CallbackUpdate, StateChange};
use data_model_tkw::schema::requests;

/// Writes the callback's outcome onto the matching request, whatever state it is in.
///
/// Returns how many rows changed: 0 when no request has that id, including ids that are not UUIDs.
pub async fn apply_callback(
    conn: &mut AsyncPgConnection,
    update: &CallbackUpdate,
) -> Result<usize, diesel::result::Error> {
    let Ok(id) = Uuid::parse_str(&update.id) else {
        return Ok(0);
    };

    diesel::update(requests::table.find(id))
        .set(&StateChange::new(update.state.clone(), Utc::now()))
        .execute(conn)
        .await
}

/// POST /api/callback - The automation system reports a finished or failed request
///
/// The body is read as JSON regardless of its content type.
pub async fn post_callback(
    State(pool): State<DbPool>,
    body: Bytes,
) -> Result<impl IntoResponse, CallbackError> {
    let body: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Callback body is not JSON");
        CallbackError::InvalidBody
    })?;

    let update = CallbackUpdate::try_from(body).inspect_err(|e| {
        tracing::warn!(error = %e, "Rejected callback");
    })?;

    let mut conn = pool.get().await?;
    let changed = apply_callback(&mut conn, &update).await.map_err(|e| {
        tracing::error!(id = %update.id, error = %e, "Failed to apply callback");
        CallbackError::from(e)
    })?;

    if changed == 0 {
        tracing::warn!(id = %update.id, "Callback does not match any request");
    } else {
        tracing::info!(id = %update.id, status = %update.state.status(), "Request updated from callback");
    }

    Ok((StatusCode::OK, Json(CallbackResponse::ok())))
}
