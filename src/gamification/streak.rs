use serde::Serialize;
use sqlx::FromRow;
use time::Date;
use tracing::debug;
use uuid::Uuid;

use super::store::GamificationStore;

/// Consecutive-day completion streak, one row per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Streak {
    pub user_id: Uuid,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_completed: Option<Date>,
}

impl Streak {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            current_streak: 0,
            longest_streak: 0,
            last_completed: None,
        }
    }

    /// Applies one completion on `event_date`.
    ///
    /// The day after `last_completed` extends the streak, any other day except
    /// `last_completed` itself restarts it at 1. A repeat on the same day
    /// leaves the count alone.
    pub fn record_completion(&mut self, event_date: Date) {
        let continues = match (self.last_completed, event_date.previous_day()) {
            (Some(last), Some(yesterday)) => last == yesterday,
            _ => false,
        };

        if continues {
            self.current_streak = self.current_streak.saturating_add(1);
        } else if self.last_completed != Some(event_date) {
            self.current_streak = 1;
        }

        self.last_completed = Some(event_date);
        self.longest_streak = self.longest_streak.max(self.current_streak);
    }
}

/// Loads (or creates) the user's streak under lock, applies `event_date` and persists it.
pub async fn update_streak<S>(
    store: &mut S,
    user_id: Uuid,
    event_date: Date,
) -> Result<Streak, sqlx::Error>
where
    S: GamificationStore + ?Sized,
{
    let mut streak = store.streak_for_update(user_id).await?;
    let before = streak.current_streak;
    streak.record_completion(event_date);
    store.save_streak(&streak).await?;
    debug!(
        %user_id,
        %event_date,
        before,
        current = streak.current_streak,
        longest = streak.longest_streak,
        "streak updated"
    );
    Ok(streak)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamification::memory::MemoryStore;
    use time::macros::date;

    fn streak_at(last: Date, current: i32, longest: i32) -> Streak {
        Streak {
            user_id: Uuid::new_v4(),
            current_streak: current,
            longest_streak: longest,
            last_completed: Some(last),
        }
    }

    #[test]
    fn first_completion_starts_at_one() {
        let mut s = Streak::new(Uuid::new_v4());
        s.record_completion(date!(2024 - 01 - 01));
        assert_eq!(s.current_streak, 1);
        assert_eq!(s.longest_streak, 1);
        assert_eq!(s.last_completed, Some(date!(2024 - 01 - 01)));
    }

    #[test]
    fn next_day_continues() {
        let mut s = streak_at(date!(2024 - 03 - 04), 4, 4);
        s.record_completion(date!(2024 - 03 - 05));
        assert_eq!(s.current_streak, 5);
        assert_eq!(s.longest_streak, 5);
    }

    #[test]
    fn continues_across_month_and_year_boundaries() {
        let mut s = streak_at(date!(2023 - 12 - 31), 2, 2);
        s.record_completion(date!(2024 - 01 - 01));
        assert_eq!(s.current_streak, 3);

        let mut s = streak_at(date!(2024 - 02 - 28), 1, 1);
        s.record_completion(date!(2024 - 02 - 29));
        assert_eq!(s.current_streak, 2);
    }

    #[test]
    fn gap_of_two_or_more_days_resets_to_one() {
        for gap in [2i64, 3, 30] {
            let last = date!(2024 - 05 - 01);
            let mut s = streak_at(last, 6, 9);
            s.record_completion(last + time::Duration::days(gap));
            assert_eq!(s.current_streak, 1, "gap {gap}");
            assert_eq!(s.longest_streak, 9);
        }
    }

    #[test]
    fn same_day_repeat_is_stable() {
        let day = date!(2024 - 01 - 02);
        let mut s = streak_at(date!(2024 - 01 - 01), 1, 1);
        s.record_completion(day);
        let after_first = s.clone();
        s.record_completion(day);
        assert_eq!(s, after_first);
        assert_eq!(s.current_streak, 2);
    }

    #[test]
    fn earlier_date_than_last_completed_restarts() {
        let mut s = streak_at(date!(2024 - 01 - 10), 3, 3);
        s.record_completion(date!(2024 - 01 - 05));
        assert_eq!(s.current_streak, 1);
        assert_eq!(s.longest_streak, 3);
        assert_eq!(s.last_completed, Some(date!(2024 - 01 - 05)));
    }

    #[test]
    fn longest_never_decreases_and_bounds_current() {
        let start = date!(2024 - 01 - 01);
        // day offsets: run of 3, gap, run of 2, repeats, gap, run of 5
        let offsets = [0i64, 1, 2, 5, 6, 6, 6, 10, 11, 12, 13, 14];
        let mut s = Streak::new(Uuid::new_v4());
        let mut prev_longest = 0;
        for off in offsets {
            s.record_completion(start + time::Duration::days(off));
            assert!(s.longest_streak >= prev_longest);
            assert!(s.longest_streak >= s.current_streak);
            prev_longest = s.longest_streak;
        }
        assert_eq!(s.current_streak, 5);
        assert_eq!(s.longest_streak, 5);
    }

    #[tokio::test]
    async fn update_streak_scenario_with_store() {
        let user = Uuid::new_v4();
        let mut store = MemoryStore::with_user(user, 0);

        let s = update_streak(&mut store, user, date!(2024 - 01 - 01)).await.unwrap();
        assert_eq!((s.current_streak, s.longest_streak), (1, 1));
        assert_eq!(s.last_completed, Some(date!(2024 - 01 - 01)));

        let s = update_streak(&mut store, user, date!(2024 - 01 - 02)).await.unwrap();
        assert_eq!((s.current_streak, s.longest_streak), (2, 2));

        let s = update_streak(&mut store, user, date!(2024 - 01 - 10)).await.unwrap();
        assert_eq!((s.current_streak, s.longest_streak), (1, 2));

        assert_eq!(store.streak(user), Some(s));
    }

    #[tokio::test]
    async fn update_streak_creates_missing_row() {
        let user = Uuid::new_v4();
        let mut store = MemoryStore::with_user(user, 0);
        assert!(store.streak(user).is_none());

        update_streak(&mut store, user, date!(2024 - 06 - 01)).await.unwrap();
        assert_eq!(store.streak(user).map(|s| s.current_streak), Some(1));
    }
}
