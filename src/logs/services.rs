use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{CreateLogRequest, CreatedLogResponse, LogDetails};
use super::repo;
use crate::error::AppError;
use crate::gamification;
use crate::state::AppState;
use crate::workouts::repo as workouts_repo;

/// Creates a log with its sets. A completed log also runs the points, streak
/// and badge updates; everything commits in one transaction or not at all.
pub async fn log_workout(
    st: &AppState,
    user_id: Uuid,
    req: CreateLogRequest,
) -> Result<CreatedLogResponse, AppError> {
    req.validate()?;
    let today = st.clock.today();

    let mut tx = st.db.begin().await?;

    if !workouts_repo::workout_exists(&mut tx, req.workout_id).await? {
        warn!(%user_id, workout_id = %req.workout_id, "log references unknown workout");
        return Err(AppError::not_found("workout"));
    }
    let missing = workouts_repo::missing_exercises(&mut tx, &req.exercise_ids()).await?;
    if let Some(id) = missing.first() {
        warn!(%user_id, exercise_id = %id, "log references unknown exercise");
        return Err(AppError::not_found(format!("exercise {id}")));
    }

    let log = repo::insert_log(
        &mut tx,
        user_id,
        req.workout_id,
        today,
        req.completed,
        req.duration as i32,
        &req.notes,
    )
    .await?;
    repo::insert_sets(&mut tx, log.id, &req.sets).await?;

    let gamification = if req.completed {
        Some(gamification::record_completion(&mut tx, user_id, today).await?)
    } else {
        None
    };

    let sets = repo::sets_for_log(&mut *tx, log.id).await?;
    tx.commit().await?;

    info!(
        %user_id,
        log_id = %log.id,
        completed = log.completed,
        sets = sets.len(),
        "workout logged"
    );
    Ok(CreatedLogResponse {
        details: LogDetails { log, sets },
        gamification,
    })
}
