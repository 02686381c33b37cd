use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ScheduleEntry {
    pub id: Uuid,
    pub day: String,
    pub workout_id: Uuid,
    pub workout_title: String,
    pub note: String,
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> Result<Vec<ScheduleEntry>, sqlx::Error> {
    sqlx::query_as::<_, ScheduleEntry>(
        r#"
        SELECT s.id, s.day, s.workout_id, w.title AS workout_title, s.note
          FROM workout_schedules s
          JOIN workouts w ON w.id = s.workout_id
         WHERE s.user_id = $1
         ORDER BY w.title
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// Returns `None` when the workout does not exist.
pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    day: &str,
    workout_id: Uuid,
    note: &str,
) -> Result<Option<ScheduleEntry>, sqlx::Error> {
    sqlx::query_as::<_, ScheduleEntry>(
        r#"
        WITH inserted AS (
            INSERT INTO workout_schedules (user_id, day, workout_id, note)
            SELECT $1, $2, w.id, $4 FROM workouts w WHERE w.id = $3
            RETURNING id, day, workout_id, note
        )
        SELECT i.id, i.day, i.workout_id, w.title AS workout_title, i.note
          FROM inserted i
          JOIN workouts w ON w.id = i.workout_id
        "#,
    )
    .bind(user_id)
    .bind(day)
    .bind(workout_id)
    .bind(note)
    .fetch_optional(db)
    .await
}
