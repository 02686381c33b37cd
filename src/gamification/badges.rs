use serde::Serialize;
use sqlx::FromRow;
use time::Date;
use tracing::info;
use uuid::Uuid;

use super::store::GamificationStore;
use super::streak::Streak;

/// Badge catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Badge {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub icon: String,
}

/// Condition under which a rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Fires only on the completion that makes the current streak exactly this long.
    StreakReached(i32),
    /// Fires whenever the point total is at or above the threshold.
    PointsAtLeast(i32),
}

impl Trigger {
    pub fn fires(&self, streak: &Streak, points: i32) -> bool {
        match *self {
            Trigger::StreakReached(n) => streak.current_streak == n,
            Trigger::PointsAtLeast(n) => points >= n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeRule {
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub trigger: Trigger,
}

pub const BADGE_RULES: &[BadgeRule] = &[
    BadgeRule {
        name: "7-Day Streak",
        description: "Logged 7 days in a row!",
        icon: "🔥",
        trigger: Trigger::StreakReached(7),
    },
    BadgeRule {
        name: "100 Points",
        description: "Earned 100 points!",
        icon: "🏅",
        trigger: Trigger::PointsAtLeast(100),
    },
];

/// Runs every rule in [`BADGE_RULES`] and returns the badges awarded for the first time.
pub async fn evaluate_and_award<S>(
    store: &mut S,
    user_id: Uuid,
    streak: &Streak,
    points: i32,
    awarded_on: Date,
) -> Result<Vec<Badge>, sqlx::Error>
where
    S: GamificationStore + ?Sized,
{
    evaluate_rules(store, BADGE_RULES, user_id, streak, points, awarded_on).await
}

/// Every rule is checked independently; several can award in one call.
pub async fn evaluate_rules<S>(
    store: &mut S,
    rules: &[BadgeRule],
    user_id: Uuid,
    streak: &Streak,
    points: i32,
    awarded_on: Date,
) -> Result<Vec<Badge>, sqlx::Error>
where
    S: GamificationStore + ?Sized,
{
    let mut awarded = Vec::new();
    for rule in rules.iter().filter(|r| r.trigger.fires(streak, points)) {
        let badge = store.ensure_badge(rule).await?;
        if store.award_badge(user_id, badge.id, awarded_on).await? {
            info!(%user_id, badge = %badge.name, "badge awarded");
            awarded.push(badge);
        }
    }
    Ok(awarded)
}
