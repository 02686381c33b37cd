use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::Date;
use uuid::Uuid;

use super::dto::SetLogRequest;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkoutLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workout_id: Uuid,
    pub workout_title: String,
    pub date: Date,
    pub completed: bool,
    pub notes: String,
    pub duration: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SetLog {
    pub id: Uuid,
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub set_number: i32,
    pub reps: i32,
    pub weight: Option<f64>,
}

pub async fn insert_log(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    workout_id: Uuid,
    date: Date,
    completed: bool,
    duration: i32,
    notes: &str,
) -> Result<WorkoutLog, sqlx::Error> {
    sqlx::query_as::<_, WorkoutLog>(
        r#"
        WITH inserted AS (
            INSERT INTO workout_logs (user_id, workout_id, date, completed, duration, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, workout_id, date, completed, notes, duration
        )
        SELECT i.id, i.user_id, i.workout_id, w.title AS workout_title,
               i.date, i.completed, i.notes, i.duration
          FROM inserted i
          JOIN workouts w ON w.id = i.workout_id
        "#,
    )
    .bind(user_id)
    .bind(workout_id)
    .bind(date)
    .bind(completed)
    .bind(duration)
    .bind(notes)
    .fetch_one(&mut **tx)
    .await
}

pub async fn insert_sets(
    tx: &mut Transaction<'_, Postgres>,
    log_id: Uuid,
    sets: &[SetLogRequest],
) -> Result<(), sqlx::Error> {
    for set in sets {
        sqlx::query(
            r#"
            INSERT INTO workout_set_logs (log_id, exercise_id, set_number, reps, weight)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(log_id)
        .bind(set.exercise_id)
        .bind(set.set_number as i32)
        .bind(set.reps as i32)
        .bind(set.weight)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

pub async fn sets_for_log<'e, E>(executor: E, log_id: Uuid) -> Result<Vec<SetLog>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, SetLog>(
        r#"
        SELECT s.id, s.exercise_id, e.name AS exercise_name, s.set_number, s.reps, s.weight
          FROM workout_set_logs s
          JOIN exercises e ON e.id = s.exercise_id
         WHERE s.log_id = $1
         ORDER BY s.set_number, e.name
        "#,
    )
    .bind(log_id)
    .fetch_all(executor)
    .await
}

pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<WorkoutLog>, sqlx::Error> {
    sqlx::query_as::<_, WorkoutLog>(
        r#"
        SELECT l.id, l.user_id, l.workout_id, w.title AS workout_title,
               l.date, l.completed, l.notes, l.duration
          FROM workout_logs l
          JOIN workouts w ON w.id = l.workout_id
         WHERE l.user_id = $1
         ORDER BY l.date DESC, l.created_at DESC
         LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
}

pub async fn find_for_user(
    db: &PgPool,
    user_id: Uuid,
    log_id: Uuid,
) -> Result<Option<WorkoutLog>, sqlx::Error> {
    sqlx::query_as::<_, WorkoutLog>(
        r#"
        SELECT l.id, l.user_id, l.workout_id, w.title AS workout_title,
               l.date, l.completed, l.notes, l.duration
          FROM workout_logs l
          JOIN workouts w ON w.id = l.workout_id
         WHERE l.id = $1 AND l.user_id = $2
        "#,
    )
    .bind(log_id)
    .bind(user_id)
    .fetch_optional(db)
    .await
}
