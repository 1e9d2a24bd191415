use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use data_model_tkw::db::DbPool;
use data_model_tkw::models::{
    AppError, DispatchPayload, GenerationRequest, RequestListResponse, RequestLookupError, Resubmission, SearchQuery,
    SubmitError, SubmitPayload, SubmitResponse, Submission,
};
use data_model_tkw::schema::requests;
use data_model_tkw::search::filter_by_search;

use crate::state::AppState;

/// Every stored request, newest first.
pub async fn load_history(conn: &mut AsyncPgConnection) -> Result<Vec<GenerationRequest>, diesel::result::Error> {
    requests::table
        .order((requests::created_at.desc(), requests::id.desc()))
        .select(GenerationRequest::as_select())
        .load(conn)
        .await
}

/// The most recent request carrying `project_name`, locked until the surrounding transaction ends.
async fn lock_latest_by_name(
    conn: &mut AsyncPgConnection,
    project_name: &str,
) -> Result<Option<GenerationRequest>, diesel::result::Error> {
    requests::table
        .filter(requests::project_name.eq(project_name))
        .order((requests::created_at.desc(), requests::id.desc()))
        .select(GenerationRequest::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()
}

/// Stores a submission as a pending request.
///
/// If a request with the same project name exists, the most recent one is reset to pending with the
/// new website structure and its id is kept. Its `created_at` and business details are left as they
/// were. Otherwise a new record is inserted under a fresh id.
///
/// Returns the stored record and whether it was reused.
pub async fn upsert_request(
    conn: &mut AsyncPgConnection,
    submission: &Submission,
) -> Result<(GenerationRequest, bool), diesel::result::Error> {
    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        async move {
            let now = Utc::now();
            match lock_latest_by_name(conn, &submission.project_name).await? {
                Some(existing) => {
                    let reset = diesel::update(requests::table.find(existing.id))
                        .set(&Resubmission::new(submission.website_structure.clone(), now))
                        .returning(GenerationRequest::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok((reset, true))
                }
                None => {
                    let created = diesel::insert_into(requests::table)
                        .values(&GenerationRequest::new_pending(Uuid::new_v4(), submission, now))
                        .returning(GenerationRequest::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok((created, false))
                }
            }
        }
        .scope_boxed()
    })
    .await
}

/// POST /api/requests - Store a request as pending and hand it to the automation system
///
/// Responds 201 for a new record and 200 when an existing one was reused. The record stays
/// pending if dispatch fails; the error is passed on to the caller.
pub async fn post_request(
    State(state): State<AppState>,
    Json(payload): Json<SubmitPayload>,
) -> Result<impl IntoResponse, SubmitError> {
    let submission = Submission::try_from(payload)?;

    // The connection goes back to the pool before the outbound call
    let (request, reused) = {
        let mut conn = state.pool.get().await?;
        upsert_request(&mut conn, &submission).await?
    };
    tracing::info!(
        id = %request.id,
        project_name = %request.project_name,
        reused,
        "Stored pending request"
    );

    let dispatch = DispatchPayload::new(request.id, &submission, state.callback_url.as_str());
    let automation = state.automation.forward(&dispatch).await.map_err(|e| {
        tracing::error!(id = %request.id, error = %e, "Dispatch to automation webhook failed");
        SubmitError::from(e)
    })?;

    let status = if reused { StatusCode::OK } else { StatusCode::CREATED };
    Ok((
        status,
        Json(SubmitResponse {
            id: request.id,
            reused,
            automation,
        }),
    ))
}

/// GET /api/requests - Request history, newest first, optionally filtered by `search`
pub async fn get_requests(
    State(pool): State<DbPool>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get().await?;
    let items = filter_by_search(load_history(&mut conn).await?, query.search.as_deref());
    Ok((StatusCode::OK, Json(RequestListResponse { items })))
}

/// GET /api/requests/{id} - A single request
pub async fn get_request(
    State(pool): State<DbPool>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, RequestLookupError> {
    let id = Uuid::parse_str(&id).map_err(|_| RequestLookupError::InvalidId)?;
    let mut conn = pool.get().await?;

    let request = requests::table
        .find(id)
        .select(GenerationRequest::as_select())
        .first(&mut conn)
        .await?;

    Ok((StatusCode::OK, Json(request)))
}
