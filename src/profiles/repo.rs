use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::dto::UpdateProfileRequest;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub user_id: Uuid,
    pub username: String,
    pub bio: String,
    pub avatar: Option<String>,
    pub fitness_goals: String,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<i32>,
    pub points: i32,
}

pub async fn find(db: &PgPool, user_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        r#"
        SELECT p.user_id, u.username, p.bio, p.avatar, p.fitness_goals,
               p.height_cm, p.weight_kg, p.points
          FROM profiles p
          JOIN users u ON u.id = p.user_id
         WHERE p.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
}

/// Points are not writable here.
pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    req: &UpdateProfileRequest,
) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        r#"
        WITH updated AS (
            UPDATE profiles
               SET bio = $2, avatar = $3, fitness_goals = $4, height_cm = $5, weight_kg = $6
             WHERE user_id = $1
            RETURNING user_id, bio, avatar, fitness_goals, height_cm, weight_kg, points
        )
        SELECT p.user_id, u.username, p.bio, p.avatar, p.fitness_goals,
               p.height_cm, p.weight_kg, p.points
          FROM updated p
          JOIN users u ON u.id = p.user_id
        "#,
    )
    .bind(user_id)
    .bind(&req.bio)
    .bind(&req.avatar)
    .bind(&req.fitness_goals)
    .bind(req.height_cm.map(|v| v as i32))
    .bind(req.weight_kg.map(|v| v as i32))
    .fetch_optional(db)
    .await
}
