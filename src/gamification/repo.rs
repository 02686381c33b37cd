use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::Date;
use uuid::Uuid;

use super::streak::Streak;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AwardedBadge {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub date_awarded: Date,
}

pub async fn find_streak(db: &PgPool, user_id: Uuid) -> Result<Option<Streak>, sqlx::Error> {
    sqlx::query_as::<_, Streak>(
        r#"
        SELECT user_id, current_streak, longest_streak, last_completed
          FROM streaks
         WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
}

pub async fn list_user_badges(db: &PgPool, user_id: Uuid) -> Result<Vec<AwardedBadge>, sqlx::Error> {
    sqlx::query_as::<_, AwardedBadge>(
        r#"
        SELECT b.name, b.description, b.icon, ub.date_awarded
          FROM user_badges ub
          JOIN badges b ON b.id = ub.badge_id
         WHERE ub.user_id = $1
         ORDER BY ub.date_awarded DESC, b.name
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}
