use uuid::Uuid;

use super::store::GamificationStore;

/// Points credited for every completed workout log.
pub const POINTS_PER_COMPLETION: i32 = 10;

/// Adds `amount` to the user's profile points and returns the new total.
pub async fn award_points<S>(store: &mut S, user_id: Uuid, amount: i32) -> Result<i32, sqlx::Error>
where
    S: GamificationStore + ?Sized,
{
    store.add_points(user_id, amount).await
}
