use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{SearchQuery, WorkoutRequest};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Workout {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub body_part: String,
    pub duration_minutes: i32,
    pub likes: i32,
    pub image: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const WORKOUT_COLUMNS: &str = "id, author_id, title, description, difficulty, workout_type, \
     body_part, duration_minutes, likes, image, created_at, updated_at";

/// Escapes LIKE metacharacters so user input matches literally.
pub(crate) fn like_pattern(q: &str) -> String {
    let escaped = q
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

pub async fn list_exercises(db: &PgPool) -> Result<Vec<Exercise>, sqlx::Error> {
    sqlx::query_as::<_, Exercise>(r#"SELECT id, name, description FROM exercises ORDER BY name"#)
        .fetch_all(db)
        .await
}

pub async fn create_exercise(
    db: &PgPool,
    name: &str,
    description: &str,
) -> Result<Exercise, sqlx::Error> {
    sqlx::query_as::<_, Exercise>(
        r#"
        INSERT INTO exercises (name, description)
        VALUES ($1, $2)
        RETURNING id, name, description
        "#,
    )
    .bind(name)
    .bind(description)
    .fetch_one(db)
    .await
}

/// Returns the ids from `ids` that have no exercise row.
pub async fn missing_exercises(
    tx: &mut Transaction<'_, Postgres>,
    ids: &[Uuid],
) -> Result<Vec<Uuid>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT requested.id
          FROM UNNEST($1::uuid[]) AS requested(id)
         WHERE NOT EXISTS (SELECT 1 FROM exercises e WHERE e.id = requested.id)
        "#,
    )
    .bind(ids)
    .fetch_all(&mut **tx)
    .await
}

pub async fn list_workouts(db: &PgPool, limit: i64, offset: i64) -> Result<Vec<Workout>, sqlx::Error> {
    sqlx::query_as::<_, Workout>(&format!(
        "SELECT {WORKOUT_COLUMNS} FROM workouts ORDER BY created_at DESC LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
}

pub async fn search_workouts(db: &PgPool, q: &SearchQuery) -> Result<Vec<Workout>, sqlx::Error> {
    let text = q.q.trim();
    sqlx::query_as::<_, Workout>(&format!(
        r#"
        SELECT {WORKOUT_COLUMNS}
          FROM workouts
         WHERE ($1 = '' OR title ILIKE $2 OR description ILIKE $2)
           AND ($3::text IS NULL OR difficulty = $3)
           AND ($4::text IS NULL OR body_part = $4)
         ORDER BY created_at DESC
        "#
    ))
    .bind(text)
    .bind(like_pattern(text))
    .bind(q.difficulty.map(|d| d.as_str()))
    .bind(q.body_part.map(|b| b.as_str()))
    .fetch_all(db)
    .await
}

pub async fn find_workout(db: &PgPool, id: Uuid) -> Result<Option<Workout>, sqlx::Error> {
    sqlx::query_as::<_, Workout>(&format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn workout_exists(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(r#"SELECT EXISTS (SELECT 1 FROM workouts WHERE id = $1)"#)
        .bind(id)
        .fetch_one(&mut **tx)
        .await
}

pub async fn exercise_ids_for(db: &PgPool, workout_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"SELECT exercise_id FROM workout_exercises WHERE workout_id = $1 ORDER BY exercise_id"#,
    )
    .bind(workout_id)
    .fetch_all(db)
    .await
}

/// Locks the workout row and returns its author.
pub async fn author_for_update(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(r#"SELECT author_id FROM workouts WHERE id = $1 FOR UPDATE"#)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
}

pub async fn insert_workout(
    tx: &mut Transaction<'_, Postgres>,
    author_id: Uuid,
    req: &WorkoutRequest,
) -> Result<Workout, sqlx::Error> {
    sqlx::query_as::<_, Workout>(&format!(
        r#"
        INSERT INTO workouts
            (author_id, title, description, difficulty, workout_type, body_part, duration_minutes, image)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {WORKOUT_COLUMNS}
        "#
    ))
    .bind(author_id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(req.difficulty.as_str())
    .bind(req.workout_type.as_str())
    .bind(req.body_part.as_str())
    .bind(req.duration_minutes as i32)
    .bind(&req.image)
    .fetch_one(&mut **tx)
    .await
}

pub async fn update_workout(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    req: &WorkoutRequest,
) -> Result<Workout, sqlx::Error> {
    sqlx::query_as::<_, Workout>(&format!(
        r#"
        UPDATE workouts
           SET title = $2, description = $3, difficulty = $4, workout_type = $5,
               body_part = $6, duration_minutes = $7, image = $8, updated_at = now()
         WHERE id = $1
        RETURNING {WORKOUT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(req.difficulty.as_str())
    .bind(req.workout_type.as_str())
    .bind(req.body_part.as_str())
    .bind(req.duration_minutes as i32)
    .bind(&req.image)
    .fetch_one(&mut **tx)
    .await
}

/// Replaces the workout's exercise set.
pub async fn set_exercises(
    tx: &mut Transaction<'_, Postgres>,
    workout_id: Uuid,
    exercise_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    sqlx::query(r#"DELETE FROM workout_exercises WHERE workout_id = $1"#)
        .bind(workout_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query(
        r#"
        INSERT INTO workout_exercises (workout_id, exercise_id)
        SELECT $1, UNNEST($2::uuid[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(workout_id)
    .bind(exercise_ids)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn delete_workout(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(r#"DELETE FROM workouts WHERE id = $1"#)
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn increment_likes(db: &PgPool, id: Uuid) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        r#"UPDATE workouts SET likes = likes + 1 WHERE id = $1 RETURNING likes"#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}
