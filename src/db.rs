use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")
}

pub async fn migrate(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")
}

/// Migrated pool for tests that need Postgres. `None` when `DATABASE_URL` is unset,
/// so those tests skip instead of failing on machines without a database.
#[cfg(test)]
pub async fn test_pool() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").ok()?;
    let db = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("connect to test database");
    migrate(&db).await.expect("migrate test database");
    Some(db)
}

/// Inserts a user with an empty profile and a workout authored by them.
#[cfg(test)]
pub async fn seed_user_and_workout(db: &PgPool) -> (uuid::Uuid, uuid::Uuid) {
    let tag = uuid::Uuid::new_v4().simple().to_string();
    let user = crate::auth::repo::User::create_with_profile(
        db,
        &format!("user-{tag}"),
        &format!("{tag}@example.com"),
        "not-a-real-hash",
    )
    .await
    .expect("seed user");
    let workout_id = sqlx::query_scalar::<_, uuid::Uuid>(
        r#"INSERT INTO workouts (author_id, title) VALUES ($1, 'Seed') RETURNING id"#,
    )
    .bind(user.id)
    .fetch_one(db)
    .await
    .expect("seed workout");
    (user.id, workout_id)
}
