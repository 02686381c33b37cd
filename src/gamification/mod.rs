//! Points, streaks and badges applied when a workout log is completed.
//!
//! The order is fixed: points first, then the streak, then the badge rules,
//! which read both updated values.

pub mod badges;
#[cfg(test)]
pub(crate) mod memory;
pub mod points;
pub mod repo;
pub mod store;
pub mod streak;

use serde::Serialize;
use time::Date;
use tracing::instrument;
use uuid::Uuid;

pub use badges::Badge;
pub use store::GamificationStore;
pub use streak::Streak;

/// What a single completion changed for the user.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionOutcome {
    pub points: i32,
    pub streak: Streak,
    pub new_badges: Vec<Badge>,
}

#[instrument(skip(store))]
pub async fn record_completion<S>(
    store: &mut S,
    user_id: Uuid,
    event_date: Date,
) -> Result<CompletionOutcome, sqlx::Error>
where
    S: GamificationStore + ?Sized,
{
    let points = points::award_points(store, user_id, points::POINTS_PER_COMPLETION).await?;
    let streak = streak::update_streak(store, user_id, event_date).await?;
    let new_badges = badges::evaluate_and_award(store, user_id, &streak, points, event_date).await?;

    Ok(CompletionOutcome {
        points,
        streak,
        new_badges,
    })
}
