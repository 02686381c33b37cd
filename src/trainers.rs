use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::{error::AppResult, state::AppState};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Trainer {
    pub id: Uuid,
    pub name: String,
    pub bio: String,
    pub specialties: String,
    pub email: String,
    pub phone: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/trainers", get(list_trainers))
}

pub async fn list_active(db: &PgPool) -> Result<Vec<Trainer>, sqlx::Error> {
    sqlx::query_as::<_, Trainer>(
        r#"
        SELECT id, name, bio, specialties, email, phone
          FROM trainers
         WHERE active
         ORDER BY name
        "#,
    )
    .fetch_all(db)
    .await
}

/// Public.
#[instrument(skip(state))]
pub async fn list_trainers(State(state): State<AppState>) -> AppResult<Json<Vec<Trainer>>> {
    Ok(Json(list_active(&state.db).await?))
}
