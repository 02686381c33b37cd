use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{error, instrument};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    pagination::Pagination,
    state::AppState,
};

use super::dto::{CreateLogRequest, CreatedLogResponse, LogDetails};
use super::{repo, services};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/logs", get(list_logs).post(create_log))
        .route("/logs/:id", get(get_log))
}

#[instrument(skip(state, body), fields(workout_id = %body.workout_id))]
pub async fn create_log(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateLogRequest>,
) -> AppResult<(StatusCode, HeaderMap, Json<CreatedLogResponse>)> {
    let created = services::log_workout(&state, user_id, body).await.map_err(|e| {
        if let AppError::Persistence(ref err) = e {
            error!(error = %err, %user_id, "log_workout rolled back");
        }
        e
    })?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/logs/{}", created.details.log.id).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(created)))
}

#[instrument(skip(state))]
pub async fn list_logs(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> AppResult<Json<Vec<repo::WorkoutLog>>> {
    let (limit, offset) = p.clamped();
    Ok(Json(repo::list_by_user(&state.db, user_id, limit, offset).await?))
}

#[instrument(skip(state))]
pub async fn get_log(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LogDetails>> {
    let log = repo::find_for_user(&state.db, user_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("log"))?;
    let sets = repo::sets_for_log(&state.db, id).await?;
    Ok(Json(LogDetails { log, sets }))
}
