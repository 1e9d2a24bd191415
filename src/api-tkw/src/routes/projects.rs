use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use data_model_tkw::db::DbPool;
use data_model_tkw::models::{AppError, ProjectListResponse, SearchQuery};
use data_model_tkw::search::{filter_by_search, latest_per_project};

use crate::routes::requests::load_history;

/// GET /api/projects - One entry per project name, taken from its most recent request
///
/// The search term applies to the de-duplicated entries, so an older record that matches
/// never stands in for a project whose latest record does not.
pub async fn get_projects(
    State(pool): State<DbPool>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get().await?;
    let projects = latest_per_project(load_history(&mut conn).await?);
    let items = filter_by_search(projects, query.search.as_deref());
    Ok((StatusCode::OK, Json(ProjectListResponse { items })))
}
