use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    pagination::Pagination,
    state::AppState,
};

use super::dto::{CreateMealPlanRequest, CreateMealRequest};
use super::repo::{self, Meal, MealPlan};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/mealplans", get(list_meal_plans).post(create_meal_plan))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> AppResult<Json<Vec<Meal>>> {
    let (limit, offset) = p.clamped();
    Ok(Json(repo::list_by_user(&state.db, user_id, limit, offset).await?))
}

#[instrument(skip(state, body))]
pub async fn create_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(mut body): Json<CreateMealRequest>,
) -> AppResult<(StatusCode, Json<Meal>)> {
    body.validate()?;
    let meal = repo::create(&state.db, user_id, &body).await?;
    info!(%user_id, meal_id = %meal.id, "meal created");
    Ok((StatusCode::CREATED, Json(meal)))
}

#[instrument(skip(state))]
pub async fn list_meal_plans(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<MealPlan>>> {
    Ok(Json(repo::list_plans_by_user(&state.db, user_id).await?))
}

#[instrument(skip(state, body))]
pub async fn create_meal_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(mut body): Json<CreateMealPlanRequest>,
) -> AppResult<(StatusCode, Json<MealPlan>)> {
    body.normalize();
    let foreign = repo::foreign_meal_ids(&state.db, user_id, &body.meal_ids).await?;
    if let Some(id) = foreign.first() {
        warn!(%user_id, meal_id = %id, "meal plan references unknown meal");
        return Err(AppError::not_found(format!("meal {id}")));
    }
    let plan = repo::create_plan(&state.db, user_id, &body).await?;
    info!(%user_id, meal_plan_id = %plan.id, meals = plan.meal_ids.len(), "meal plan created");
    Ok((StatusCode::CREATED, Json(plan)))
}
