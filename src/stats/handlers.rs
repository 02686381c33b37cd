use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::instrument;

use crate::{auth::AuthUser, error::AppResult, state::AppState};

use super::charts::{self, ProgressCharts};
use super::repo::{self, DashboardStats, PointsRow, StreakRow};

const LEADERBOARD_SIZE: i64 = 10;
const PROGRESS_LOGS: i64 = 10;

#[derive(Debug, Serialize)]
pub struct Leaderboard {
    pub top_points: Vec<PointsRow>,
    pub top_streaks: Vec<StreakRow>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/progress", get(progress))
        .route("/leaderboard", get(leaderboard))
}

#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<DashboardStats>> {
    Ok(Json(repo::dashboard(&state.db, user_id).await?))
}

#[instrument(skip(state))]
pub async fn progress(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<ProgressCharts>> {
    let windows = charts::last_four_weeks(state.clock.today());
    let mut counts = Vec::with_capacity(windows.len());
    for w in &windows {
        counts.push(repo::completed_between(&state.db, user_id, w.start, w.end).await?);
    }

    let points = repo::recent_completed(&state.db, user_id, PROGRESS_LOGS).await?;
    let (weight, calories) = charts::weight_and_calorie_charts(&points);

    Ok(Json(ProgressCharts {
        frequency: charts::frequency_chart(&windows, counts),
        weight,
        calories,
    }))
}

#[instrument(skip(state))]
pub async fn leaderboard(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> AppResult<Json<Leaderboard>> {
    Ok(Json(Leaderboard {
        top_points: repo::top_points(&state.db, LEADERBOARD_SIZE).await?,
        top_streaks: repo::top_streaks(&state.db, LEADERBOARD_SIZE).await?,
    }))
}
