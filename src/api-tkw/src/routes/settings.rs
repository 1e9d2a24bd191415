use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use data_model_tkw::models::SettingsResponse;

use crate::state::AppState;

/// GET /api/settings - Configuration the frontend displays
pub async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(SettingsResponse {
            callback_url: state.callback_url.to_string(),
        }),
    )
}
