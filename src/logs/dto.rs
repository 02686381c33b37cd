use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::gamification::CompletionOutcome;

use super::repo::{SetLog, WorkoutLog};

#[derive(Debug, Clone, Deserialize)]
pub struct SetLogRequest {
    pub exercise_id: Uuid,
    pub set_number: u32,
    pub reps: u32,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLogRequest {
    pub workout_id: Uuid,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub sets: Vec<SetLogRequest>,
}

impl CreateLogRequest {
    /// Shape checks that need no database access.
    pub fn validate(&self) -> Result<(), AppError> {
        if i32::try_from(self.duration).is_err() {
            return Err(AppError::validation("duration is too large"));
        }
        for (i, set) in self.sets.iter().enumerate() {
            if set.set_number == 0 {
                return Err(AppError::validation(format!("sets[{i}]: set_number must be >= 1")));
            }
            if i32::try_from(set.set_number).is_err() || i32::try_from(set.reps).is_err() {
                return Err(AppError::validation(format!("sets[{i}]: value out of range")));
            }
            if let Some(w) = set.weight {
                if !w.is_finite() || w < 0.0 {
                    return Err(AppError::validation(format!(
                        "sets[{i}]: weight must be a non-negative number"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn exercise_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self.sets.iter().map(|s| s.exercise_id).collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

#[derive(Debug, Serialize)]
pub struct LogDetails {
    #[serde(flatten)]
    pub log: WorkoutLog,
    pub sets: Vec<SetLog>,
}

#[derive(Debug, Serialize)]
pub struct CreatedLogResponse {
    #[serde(flatten)]
    pub details: LogDetails,
    /// Absent when the log was not marked completed.
    pub gamification: Option<CompletionOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(sets: Vec<SetLogRequest>) -> CreateLogRequest {
        CreateLogRequest {
            workout_id: Uuid::new_v4(),
            completed: true,
            duration: 30,
            notes: String::new(),
            sets,
        }
    }

    fn set(n: u32, weight: Option<f64>) -> SetLogRequest {
        SetLogRequest {
            exercise_id: Uuid::new_v4(),
            set_number: n,
            reps: 10,
            weight,
        }
    }

    #[test]
    fn accepts_well_formed_sets() {
        assert!(request(vec![set(1, Some(60.0)), set(2, None)]).validate().is_ok());
    }

    #[test]
    fn rejects_zero_set_number() {
        let err = request(vec![set(0, None)]).validate().unwrap_err();
        assert!(err.to_string().contains("set_number"));
    }

    #[test]
    fn rejects_negative_or_nan_weight() {
        assert!(request(vec![set(1, Some(-1.0))]).validate().is_err());
        assert!(request(vec![set(1, Some(f64::NAN))]).validate().is_err());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let id = Uuid::new_v4();
        let req: CreateLogRequest =
            serde_json::from_str(&format!(r#"{{"workout_id":"{id}"}}"#)).unwrap();
        assert!(!req.completed);
        assert_eq!(req.duration, 0);
        assert!(req.sets.is_empty());
    }

    #[test]
    fn negative_reps_fail_to_parse() {
        let body = format!(
            r#"{{"workout_id":"{}","sets":[{{"exercise_id":"{}","set_number":1,"reps":-2}}]}}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        assert!(serde_json::from_str::<CreateLogRequest>(&body).is_err());
    }

    #[test]
    fn exercise_ids_are_deduplicated() {
        let ex = Uuid::new_v4();
        let mut a = set(1, None);
        let mut b = set(2, None);
        a.exercise_id = ex;
        b.exercise_id = ex;
        assert_eq!(request(vec![a, b]).exercise_ids(), vec![ex]);
    }
}
