use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument};

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    gamification::repo as gamification_repo,
    state::AppState,
};

use super::dto::{ProfileView, UpdateProfileRequest};
use super::repo;

pub fn routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<ProfileView>> {
    let profile = repo::find(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("profile"))?;
    let streak = gamification_repo::find_streak(&state.db, user_id).await?;
    let badges = gamification_repo::list_user_badges(&state.db, user_id).await?;
    Ok(Json(ProfileView {
        profile,
        streak,
        badges,
    }))
}

#[instrument(skip(state, body))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<UpdateProfileRequest>,
) -> AppResult<Json<ProfileView>> {
    body.validate()?;
    let profile = repo::update(&state.db, user_id, &body)
        .await?
        .ok_or_else(|| AppError::not_found("profile"))?;
    info!(%user_id, "profile updated");

    let streak = gamification_repo::find_streak(&state.db, user_id).await?;
    let badges = gamification_repo::list_user_badges(&state.db, user_id).await?;
    Ok(Json(ProfileView {
        profile,
        streak,
        badges,
    }))
}
