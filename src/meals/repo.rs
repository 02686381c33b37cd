use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::Date;
use uuid::Uuid;

use super::dto::{CreateMealPlanRequest, CreateMealRequest};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub calories: i32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub date: Date,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: Date,
    pub notes: String,
    pub meal_ids: Vec<Uuid>,
}

pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Meal>, sqlx::Error> {
    let rows = sqlx::query_as::<_, Meal>(
        r#"
        SELECT id, user_id, name, calories, protein, carbs, fat, date, notes
        FROM meals
        WHERE user_id = $1
        ORDER BY date DESC, name
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn create(db: &PgPool, user_id: Uuid, req: &CreateMealRequest) -> Result<Meal, sqlx::Error> {
    let meal = sqlx::query_as::<_, Meal>(
        r#"
        INSERT INTO meals (user_id, name, calories, protein, carbs, fat, date, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, user_id, name, calories, protein, carbs, fat, date, notes
        "#,
    )
    .bind(user_id)
    .bind(&req.name)
    .bind(req.calories as i32)
    .bind(req.protein)
    .bind(req.carbs)
    .bind(req.fat)
    .bind(req.date)
    .bind(&req.notes)
    .fetch_one(db)
    .await?;
    Ok(meal)
}

pub async fn list_plans_by_user(db: &PgPool, user_id: Uuid) -> Result<Vec<MealPlan>, sqlx::Error> {
    let rows = sqlx::query_as::<_, MealPlan>(
        r#"
        SELECT p.id, p.user_id, p.date, p.notes,
               COALESCE(
                   ARRAY_AGG(pm.meal_id ORDER BY pm.meal_id) FILTER (WHERE pm.meal_id IS NOT NULL),
                   '{}'
               ) AS meal_ids
          FROM meal_plans p
          LEFT JOIN meal_plan_meals pm ON pm.meal_plan_id = p.id
         WHERE p.user_id = $1
         GROUP BY p.id
         ORDER BY p.date DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Returns the requested meal ids the user does not own.
pub async fn foreign_meal_ids(
    db: &PgPool,
    user_id: Uuid,
    meal_ids: &[Uuid],
) -> Result<Vec<Uuid>, sqlx::Error> {
    if meal_ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT requested.id
          FROM UNNEST($2::uuid[]) AS requested(id)
         WHERE NOT EXISTS (
               SELECT 1 FROM meals m WHERE m.id = requested.id AND m.user_id = $1
         )
        "#,
    )
    .bind(user_id)
    .bind(meal_ids)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn create_plan(
    db: &PgPool,
    user_id: Uuid,
    req: &CreateMealPlanRequest,
) -> Result<MealPlan, sqlx::Error> {
    let mut tx = db.begin().await?;

    let (id, date, notes) = sqlx::query_as::<_, (Uuid, Date, String)>(
        r#"
        INSERT INTO meal_plans (user_id, date, notes)
        VALUES ($1, $2, $3)
        RETURNING id, date, notes
        "#,
    )
    .bind(user_id)
    .bind(req.date)
    .bind(&req.notes)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO meal_plan_meals (meal_plan_id, meal_id)
        SELECT $1, UNNEST($2::uuid[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(id)
    .bind(&req.meal_ids)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(MealPlan {
        id,
        user_id,
        date,
        notes,
        meal_ids: req.meal_ids.clone(),
    })
}
