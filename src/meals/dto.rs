use serde::Deserialize;
use time::Date;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    pub name: String,
    #[serde(default)]
    pub calories: u32,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    pub date: Date,
    #[serde(default)]
    pub notes: String,
}

impl CreateMealRequest {
    pub fn validate(&mut self) -> Result<(), AppError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() || self.name.chars().count() > 100 {
            return Err(AppError::validation("name must be 1-100 characters"));
        }
        if i32::try_from(self.calories).is_err() {
            return Err(AppError::validation("calories is too large"));
        }
        for (field, v) in [("protein", self.protein), ("carbs", self.carbs), ("fat", self.fat)] {
            if !v.is_finite() || v < 0.0 {
                return Err(AppError::validation(format!("{field} must be a non-negative number")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateMealPlanRequest {
    pub date: Date,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub meal_ids: Vec<Uuid>,
}

impl CreateMealPlanRequest {
    pub fn normalize(&mut self) {
        self.meal_ids.sort();
        self.meal_ids.dedup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parses_iso_date() {
        let req: CreateMealRequest =
            serde_json::from_str(r#"{"name":"Oats","calories":350,"date":"2024-01-05"}"#).unwrap();
        assert_eq!(req.date, date!(2024 - 01 - 05));
        assert_eq!(req.protein, 0.0);
    }

    #[test]
    fn rejects_negative_macros_and_blank_name() {
        let mut req: CreateMealRequest =
            serde_json::from_str(r#"{"name":"Oats","fat":-1,"date":"2024-01-05"}"#).unwrap();
        assert!(req.validate().is_err());

        let mut req: CreateMealRequest =
            serde_json::from_str(r#"{"name":"  ","date":"2024-01-05"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn plan_meal_ids_deduplicated() {
        let id = Uuid::new_v4();
        let mut req = CreateMealPlanRequest {
            date: date!(2024 - 01 - 05),
            notes: String::new(),
            meal_ids: vec![id, id],
        };
        req.normalize();
        assert_eq!(req.meal_ids, vec![id]);
    }
}
