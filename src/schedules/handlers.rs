use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{info, instrument};

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
};

use super::dto::{group_by_day, CreateScheduleRequest, DaySchedule};
use super::repo::{self, ScheduleEntry};

pub fn routes() -> Router<AppState> {
    Router::new().route("/schedule", get(weekly_schedule).post(add_schedule))
}

#[instrument(skip(state))]
pub async fn weekly_schedule(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<DaySchedule>>> {
    let entries = repo::list_by_user(&state.db, user_id).await?;
    Ok(Json(group_by_day(entries)))
}

#[instrument(skip(state, body))]
pub async fn add_schedule(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateScheduleRequest>,
) -> AppResult<(StatusCode, Json<ScheduleEntry>)> {
    let entry = repo::insert(
        &state.db,
        user_id,
        body.day.as_str(),
        body.workout_id,
        body.note.trim(),
    )
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "workout already scheduled for that day"))?
    .ok_or_else(|| AppError::not_found("workout"))?;

    info!(%user_id, day = %entry.day, workout_id = %entry.workout_id, "workout scheduled");
    Ok((StatusCode::CREATED, Json(entry)))
}
