use std::collections::HashMap;

use async_trait::async_trait;
use time::Date;
use uuid::Uuid;

use super::badges::{Badge, BadgeRule};
use super::store::GamificationStore;
use super::streak::Streak;

/// In-memory store for exercising the completion flow without Postgres.
#[derive(Debug, Default)]
pub struct MemoryStore {
    points: HashMap<Uuid, i32>,
    streaks: HashMap<Uuid, Streak>,
    badges: Vec<Badge>,
    user_badges: Vec<(Uuid, Uuid, Date)>,
    /// When set, `award_badge` fails with this simulated outage.
    pub fail_awards: bool,
}

impl MemoryStore {
    pub fn with_user(user_id: Uuid, points: i32) -> Self {
        let mut store = Self::default();
        store.add_user(user_id, points);
        store
    }

    pub fn add_user(&mut self, user_id: Uuid, points: i32) {
        self.points.insert(user_id, points);
    }

    pub fn points(&self, user_id: Uuid) -> Option<i32> {
        self.points.get(&user_id).copied()
    }

    pub fn streak(&self, user_id: Uuid) -> Option<Streak> {
        self.streaks.get(&user_id).cloned()
    }

    pub fn set_streak(&mut self, streak: Streak) {
        self.streaks.insert(streak.user_id, streak);
    }

    pub fn catalog_len(&self) -> usize {
        self.badges.len()
    }

    fn badge_id(&self, name: &str) -> Option<Uuid> {
        self.badges.iter().find(|b| b.name == name).map(|b| b.id)
    }

    pub fn user_badge_count(&self, user_id: Uuid, name: &str) -> usize {
        let Some(badge_id) = self.badge_id(name) else {
            return 0;
        };
        self.user_badges
            .iter()
            .filter(|(u, b, _)| *u == user_id && *b == badge_id)
            .count()
    }

    pub fn award_date(&self, user_id: Uuid, name: &str) -> Option<Date> {
        let badge_id = self.badge_id(name)?;
        self.user_badges
            .iter()
            .find(|(u, b, _)| *u == user_id && *b == badge_id)
            .map(|(_, _, d)| *d)
    }
}

#[async_trait]
impl GamificationStore for MemoryStore {
    async fn add_points(&mut self, user_id: Uuid, amount: i32) -> Result<i32, sqlx::Error> {
        let points = self.points.get_mut(&user_id).ok_or(sqlx::Error::RowNotFound)?;
        *points += amount;
        Ok(*points)
    }

    async fn streak_for_update(&mut self, user_id: Uuid) -> Result<Streak, sqlx::Error> {
        Ok(self
            .streaks
            .entry(user_id)
            .or_insert_with(|| Streak::new(user_id))
            .clone())
    }

    async fn save_streak(&mut self, streak: &Streak) -> Result<(), sqlx::Error> {
        self.streaks.insert(streak.user_id, streak.clone());
        Ok(())
    }

    async fn ensure_badge(&mut self, rule: &BadgeRule) -> Result<Badge, sqlx::Error> {
        if let Some(b) = self.badges.iter().find(|b| b.name == rule.name) {
            return Ok(b.clone());
        }
        let badge = Badge {
            id: Uuid::new_v4(),
            name: rule.name.to_string(),
            description: rule.description.to_string(),
            icon: rule.icon.to_string(),
        };
        self.badges.push(badge.clone());
        Ok(badge)
    }

    async fn award_badge(
        &mut self,
        user_id: Uuid,
        badge_id: Uuid,
        awarded_on: Date,
    ) -> Result<bool, sqlx::Error> {
        if self.fail_awards {
            return Err(sqlx::Error::PoolClosed);
        }
        if self
            .user_badges
            .iter()
            .any(|(u, b, _)| *u == user_id && *b == badge_id)
        {
            return Ok(false);
        }
        self.user_badges.push((user_id, badge_id, awarded_on));
        Ok(true)
    }
}
