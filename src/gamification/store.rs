use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use time::Date;
use uuid::Uuid;

use super::badges::{Badge, BadgeRule};
use super::streak::Streak;

/// Persistence used by the points/streak/badge flow.
///
/// All calls for one completion go through the same store so they commit or
/// roll back together.
#[async_trait]
pub trait GamificationStore: Send {
    /// Increments profile points and returns the new total. Locks the profile row.
    async fn add_points(&mut self, user_id: Uuid, amount: i32) -> Result<i32, sqlx::Error>;

    /// Fetches the user's streak, creating a zeroed one if absent. Locks the streak row.
    async fn streak_for_update(&mut self, user_id: Uuid) -> Result<Streak, sqlx::Error>;

    async fn save_streak(&mut self, streak: &Streak) -> Result<(), sqlx::Error>;

    /// Returns the catalog badge named by `rule`, creating it from the rule if absent.
    async fn ensure_badge(&mut self, rule: &BadgeRule) -> Result<Badge, sqlx::Error>;

    /// Awards `badge_id` to the user unless already held. Returns whether a row was created.
    async fn award_badge(
        &mut self,
        user_id: Uuid,
        badge_id: Uuid,
        awarded_on: Date,
    ) -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl<'c> GamificationStore for Transaction<'c, Postgres> {
    async fn add_points(&mut self, user_id: Uuid, amount: i32) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE profiles
               SET points = points + $2
             WHERE user_id = $1
            RETURNING points
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .fetch_one(&mut **self)
        .await
    }

    async fn streak_for_update(&mut self, user_id: Uuid) -> Result<Streak, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO streaks (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .execute(&mut **self)
        .await?;

        sqlx::query_as::<_, Streak>(
            r#"
            SELECT user_id, current_streak, longest_streak, last_completed
              FROM streaks
             WHERE user_id = $1
               FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut **self)
        .await
    }

    async fn save_streak(&mut self, streak: &Streak) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE streaks
               SET current_streak = $2,
                   longest_streak = $3,
                   last_completed = $4
             WHERE user_id = $1
            "#,
        )
        .bind(streak.user_id)
        .bind(streak.current_streak)
        .bind(streak.longest_streak)
        .bind(streak.last_completed)
        .execute(&mut **self)
        .await?;
        Ok(())
    }

    async fn ensure_badge(&mut self, rule: &BadgeRule) -> Result<Badge, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO badges (name, description, icon)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(rule.name)
        .bind(rule.description)
        .bind(rule.icon)
        .execute(&mut **self)
        .await?;

        sqlx::query_as::<_, Badge>(
            r#"SELECT id, name, description, icon FROM badges WHERE name = $1"#,
        )
        .bind(rule.name)
        .fetch_one(&mut **self)
        .await
    }

    async fn award_badge(
        &mut self,
        user_id: Uuid,
        badge_id: Uuid,
        awarded_on: Date,
    ) -> Result<bool, sqlx::Error> {
        let res = sqlx::query(
            r#"
            INSERT INTO user_badges (user_id, badge_id, date_awarded)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, badge_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(badge_id)
        .bind(awarded_on)
        .execute(&mut **self)
        .await?;
        Ok(res.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{seed_user_and_workout, test_pool};
    use crate::gamification::record_completion;
    use time::macros::date;

    /// Runs on a real transaction but fails every badge award.
    struct FailingAwards<'a, 'c>(&'a mut Transaction<'c, Postgres>);

    #[async_trait]
    impl<'a, 'c> GamificationStore for FailingAwards<'a, 'c> {
        async fn add_points(&mut self, user_id: Uuid, amount: i32) -> Result<i32, sqlx::Error> {
            self.0.add_points(user_id, amount).await
        }

        async fn streak_for_update(&mut self, user_id: Uuid) -> Result<Streak, sqlx::Error> {
            self.0.streak_for_update(user_id).await
        }

        async fn save_streak(&mut self, streak: &Streak) -> Result<(), sqlx::Error> {
            self.0.save_streak(streak).await
        }

        async fn ensure_badge(&mut self, rule: &BadgeRule) -> Result<Badge, sqlx::Error> {
            self.0.ensure_badge(rule).await
        }

        async fn award_badge(
            &mut self,
            _user_id: Uuid,
            _badge_id: Uuid,
            _awarded_on: Date,
        ) -> Result<bool, sqlx::Error> {
            Err(sqlx::Error::PoolClosed)
        }
    }

    async fn points_of(db: &sqlx::PgPool, user_id: Uuid) -> i32 {
        sqlx::query_scalar("SELECT points FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(db)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn failure_after_points_rolls_back_everything() {
        let Some(db) = test_pool().await else {
            eprintln!("DATABASE_URL not set; skipping");
            return;
        };
        let (user_id, workout_id) = seed_user_and_workout(&db).await;
        sqlx::query("UPDATE profiles SET points = 95 WHERE user_id = $1")
            .bind(user_id)
            .execute(&db)
            .await
            .unwrap();
        let day = date!(2024 - 05 - 01);

        let mut tx = db.begin().await.unwrap();
        crate::logs::repo::insert_log(&mut tx, user_id, workout_id, day, true, 30, "")
            .await
            .unwrap();
        let err = record_completion(&mut FailingAwards(&mut tx), user_id, day)
            .await
            .unwrap_err();
        assert!(matches!(err, sqlx::Error::PoolClosed));
        tx.rollback().await.unwrap();

        assert_eq!(points_of(&db, user_id).await, 95);
        let logs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workout_logs WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(logs, 0);
        assert!(crate::gamification::repo::find_streak(&db, user_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn committed_completion_persists_and_awards_once() {
        let Some(db) = test_pool().await else {
            eprintln!("DATABASE_URL not set; skipping");
            return;
        };
        let (user_id, _) = seed_user_and_workout(&db).await;
        sqlx::query("UPDATE profiles SET points = 90 WHERE user_id = $1")
            .bind(user_id)
            .execute(&db)
            .await
            .unwrap();

        for day in [date!(2024 - 05 - 01), date!(2024 - 05 - 02)] {
            let mut tx = db.begin().await.unwrap();
            record_completion(&mut tx, user_id, day).await.unwrap();
            tx.commit().await.unwrap();
        }

        assert_eq!(points_of(&db, user_id).await, 110);
        let streak = crate::gamification::repo::find_streak(&db, user_id)
            .await
            .unwrap()
            .expect("streak row");
        assert_eq!((streak.current_streak, streak.longest_streak), (2, 2));
        let badges = crate::gamification::repo::list_user_badges(&db, user_id).await.unwrap();
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].name, "100 Points");
        assert_eq!(badges[0].date_awarded, date!(2024 - 05 - 01));
    }
}
