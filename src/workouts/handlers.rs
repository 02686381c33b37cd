use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    pagination::Pagination,
    state::AppState,
};

use super::{
    dto::{
        CreateExerciseRequest, LikesResponse, SearchQuery, WorkoutDetails, WorkoutListItem,
        WorkoutRequest,
    },
    repo::{self, Exercise},
};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/exercises", get(list_exercises))
        .route("/workouts", get(list_workouts))
        .route("/workouts/search", get(search_workouts))
        .route("/workouts/:id", get(get_workout))
        .route("/workouts/:id/like", post(like_workout))
}

pub fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/exercises", post(create_exercise))
        .route("/workouts", post(create_workout))
        .route("/workouts/:id", axum::routing::put(update_workout).delete(delete_workout))
}

#[instrument(skip(state))]
pub async fn list_exercises(State(state): State<AppState>) -> AppResult<Json<Vec<Exercise>>> {
    Ok(Json(repo::list_exercises(&state.db).await?))
}

#[instrument(skip(state, body))]
pub async fn create_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateExerciseRequest>,
) -> AppResult<(StatusCode, Json<Exercise>)> {
    let name = body.name.trim();
    if name.is_empty() || name.chars().count() > 200 {
        return Err(AppError::validation("name must be 1-200 characters"));
    }
    let exercise = repo::create_exercise(&state.db, name, &body.description).await?;
    info!(%user_id, exercise_id = %exercise.id, "exercise created");
    Ok((StatusCode::CREATED, Json(exercise)))
}

#[instrument(skip(state))]
pub async fn list_workouts(
    State(state): State<AppState>,
    Query(p): Query<Pagination>,
) -> AppResult<Json<Vec<WorkoutListItem>>> {
    let (limit, offset) = p.clamped();
    let workouts = repo::list_workouts(&state.db, limit, offset).await?;
    Ok(Json(workouts.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn search_workouts(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(q): Query<SearchQuery>,
) -> AppResult<Json<Vec<WorkoutListItem>>> {
    let workouts = repo::search_workouts(&state.db, &q).await?;
    Ok(Json(workouts.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_workout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WorkoutDetails>> {
    let workout = repo::find_workout(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("workout"))?;
    let exercise_ids = repo::exercise_ids_for(&state.db, id).await?;
    Ok(Json(WorkoutDetails {
        workout,
        exercise_ids,
    }))
}

#[instrument(skip(state, body))]
pub async fn create_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(mut body): Json<WorkoutRequest>,
) -> AppResult<(StatusCode, Json<WorkoutDetails>)> {
    body.validate()?;

    let mut tx = state.db.begin().await?;
    let missing = repo::missing_exercises(&mut tx, &body.exercise_ids).await?;
    if let Some(id) = missing.first() {
        warn!(%user_id, exercise_id = %id, "workout references unknown exercise");
        return Err(AppError::not_found(format!("exercise {id}")));
    }
    let workout = repo::insert_workout(&mut tx, user_id, &body).await?;
    repo::set_exercises(&mut tx, workout.id, &body.exercise_ids).await?;
    tx.commit().await?;

    info!(%user_id, workout_id = %workout.id, "workout created");
    Ok((
        StatusCode::CREATED,
        Json(WorkoutDetails {
            workout,
            exercise_ids: body.exercise_ids,
        }),
    ))
}

#[instrument(skip(state, body))]
pub async fn update_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(mut body): Json<WorkoutRequest>,
) -> AppResult<Json<WorkoutDetails>> {
    body.validate()?;

    let mut tx = state.db.begin().await?;
    ensure_author(&mut tx, id, user_id).await?;
    let missing = repo::missing_exercises(&mut tx, &body.exercise_ids).await?;
    if let Some(ex) = missing.first() {
        return Err(AppError::not_found(format!("exercise {ex}")));
    }
    let workout = repo::update_workout(&mut tx, id, &body).await?;
    repo::set_exercises(&mut tx, id, &body.exercise_ids).await?;
    tx.commit().await?;

    info!(%user_id, workout_id = %id, "workout updated");
    Ok(Json(WorkoutDetails {
        workout,
        exercise_ids: body.exercise_ids,
    }))
}

#[instrument(skip(state))]
pub async fn delete_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let mut tx = state.db.begin().await?;
    ensure_author(&mut tx, id, user_id).await?;
    repo::delete_workout(&mut tx, id).await?;
    tx.commit().await?;

    info!(%user_id, workout_id = %id, "workout deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Public; every request adds one like.
#[instrument(skip(state))]
pub async fn like_workout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LikesResponse>> {
    let likes = repo::increment_likes(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("workout"))?;
    Ok(Json(LikesResponse { likes }))
}

async fn ensure_author(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    workout_id: Uuid,
    user_id: Uuid,
) -> AppResult<()> {
    match repo::author_for_update(tx, workout_id).await? {
        None => Err(AppError::not_found("workout")),
        Some(author) if author != user_id => {
            warn!(%user_id, %workout_id, "non-author tried to modify workout");
            Err(AppError::Forbidden)
        }
        Some(_) => Ok(()),
    }
}
