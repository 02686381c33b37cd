//! Read-only aggregates: dashboard counts, progress charts, leaderboard.

mod charts;
pub mod handlers;
mod repo;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
