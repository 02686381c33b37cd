use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::Date;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DashboardStats {
    pub workouts: i64,
    pub scheduled: i64,
    pub completed: i64,
}

/// One completed log as plotted on the progress charts.
#[derive(Debug, Clone, FromRow)]
pub struct LogPoint {
    pub date: Date,
    pub duration: i32,
    pub total_weight: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PointsRow {
    pub user_id: Uuid,
    pub username: String,
    pub points: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StreakRow {
    pub user_id: Uuid,
    pub username: String,
    pub current_streak: i32,
    pub longest_streak: i32,
}

pub async fn dashboard(db: &PgPool, user_id: Uuid) -> Result<DashboardStats, sqlx::Error> {
    sqlx::query_as::<_, DashboardStats>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM workouts WHERE author_id = $1) AS workouts,
            (SELECT COUNT(*) FROM workout_schedules WHERE user_id = $1) AS scheduled,
            (SELECT COUNT(*) FROM workout_logs WHERE user_id = $1 AND completed) AS completed
        "#,
    )
    .bind(user_id)
    .fetch_one(db)
    .await
}

pub async fn completed_between(
    db: &PgPool,
    user_id: Uuid,
    start: Date,
    end: Date,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
          FROM workout_logs
         WHERE user_id = $1 AND completed AND date BETWEEN $2 AND $3
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_one(db)
    .await
}

/// Most recent `limit` completed logs, returned oldest first.
pub async fn recent_completed(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<LogPoint>, sqlx::Error> {
    let mut rows = sqlx::query_as::<_, LogPoint>(
        r#"
        SELECT l.date, l.duration,
               COALESCE((SELECT SUM(s.weight) FROM workout_set_logs s WHERE s.log_id = l.id), 0)
                   AS total_weight
          FROM workout_logs l
         WHERE l.user_id = $1 AND l.completed
         ORDER BY l.date DESC, l.created_at DESC
         LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await?;
    rows.reverse();
    Ok(rows)
}

pub async fn top_points(db: &PgPool, limit: i64) -> Result<Vec<PointsRow>, sqlx::Error> {
    sqlx::query_as::<_, PointsRow>(
        r#"
        SELECT p.user_id, u.username, p.points
          FROM profiles p
          JOIN users u ON u.id = p.user_id
         ORDER BY p.points DESC, u.username
         LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await
}

pub async fn top_streaks(db: &PgPool, limit: i64) -> Result<Vec<StreakRow>, sqlx::Error> {
    sqlx::query_as::<_, StreakRow>(
        r#"
        SELECT s.user_id, u.username, s.current_streak, s.longest_streak
          FROM streaks s
          JOIN users u ON u.id = s.user_id
         ORDER BY s.current_streak DESC, u.username
         LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await
}
