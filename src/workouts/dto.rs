use serde::{de::DeserializeOwned, de::IntoDeserializer, Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;

use super::repo::Workout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WorkoutType {
    Cardio,
    Strength,
    Flexibility,
    Balance,
    #[default]
    Other,
}

impl WorkoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cardio => "Cardio",
            Self::Strength => "Strength",
            Self::Flexibility => "Flexibility",
            Self::Balance => "Balance",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BodyPart {
    #[default]
    #[serde(rename = "Full Body")]
    FullBody,
    Chest,
    Back,
    Legs,
    Arms,
    Shoulders,
    Core,
    Other,
}

impl BodyPart {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullBody => "Full Body",
            Self::Chest => "Chest",
            Self::Back => "Back",
            Self::Legs => "Legs",
            Self::Arms => "Arms",
            Self::Shoulders => "Shoulders",
            Self::Core => "Core",
            Self::Other => "Other",
        }
    }
}

fn default_duration() -> u32 {
    20
}

/// Body for both create and full update.
#[derive(Debug, Deserialize)]
pub struct WorkoutRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default, rename = "type")]
    pub workout_type: WorkoutType,
    #[serde(default)]
    pub body_part: BodyPart,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub exercise_ids: Vec<Uuid>,
    pub image: Option<String>,
}

impl WorkoutRequest {
    pub fn validate(&mut self) -> Result<(), AppError> {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() || self.title.chars().count() > 255 {
            return Err(AppError::validation("title must be 1-255 characters"));
        }
        if i32::try_from(self.duration_minutes).is_err() {
            return Err(AppError::validation("duration_minutes is too large"));
        }
        self.exercise_ids.sort();
        self.exercise_ids.dedup();
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateExerciseRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub body_part: Option<BodyPart>,
}

/// Search forms submit every key; a blank value means "no filter".
fn empty_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<String>::deserialize(de)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let value: serde::de::value::StrDeserializer<'_, D::Error> = value.into_deserializer();
            T::deserialize(value).map(Some)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WorkoutListItem {
    pub id: Uuid,
    pub title: String,
    pub difficulty: String,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub body_part: String,
    pub duration_minutes: i32,
    pub likes: i32,
    pub image: Option<String>,
    pub created_at: OffsetDateTime,
}

impl From<Workout> for WorkoutListItem {
    fn from(w: Workout) -> Self {
        Self {
            id: w.id,
            title: w.title,
            difficulty: w.difficulty,
            workout_type: w.workout_type,
            body_part: w.body_part,
            duration_minutes: w.duration_minutes,
            likes: w.likes,
            image: w.image,
            created_at: w.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WorkoutDetails {
    #[serde(flatten)]
    pub workout: Workout,
    pub exercise_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct LikesResponse {
    pub likes: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_follow_model_defaults() {
        let req: WorkoutRequest = serde_json::from_str(r#"{"title":"Leg day"}"#).unwrap();
        assert_eq!(req.difficulty, Difficulty::Easy);
        assert_eq!(req.workout_type, WorkoutType::Other);
        assert_eq!(req.body_part, BodyPart::FullBody);
        assert_eq!(req.duration_minutes, 20);
        assert!(req.exercise_ids.is_empty());
    }

    #[test]
    fn body_part_uses_display_names() {
        let req: WorkoutRequest =
            serde_json::from_str(r#"{"title":"x","body_part":"Full Body","type":"Cardio"}"#)
                .unwrap();
        assert_eq!(req.body_part.as_str(), "Full Body");
        assert_eq!(req.workout_type.as_str(), "Cardio");
        assert!(serde_json::from_str::<WorkoutRequest>(r#"{"title":"x","difficulty":"Extreme"}"#)
            .is_err());
    }

    #[test]
    fn negative_duration_rejected_at_parse() {
        assert!(
            serde_json::from_str::<WorkoutRequest>(r#"{"title":"x","duration_minutes":-5}"#)
                .is_err()
        );
    }

    fn search(uri: &str) -> Result<SearchQuery, axum::extract::rejection::QueryRejection> {
        let uri: axum::http::Uri = uri.parse().unwrap();
        axum::extract::Query::<SearchQuery>::try_from_uri(&uri).map(|q| q.0)
    }

    #[test]
    fn blank_search_filters_are_ignored() {
        let q = search("/workouts/search?q=run&difficulty=&body_part=").unwrap();
        assert_eq!(q.q, "run");
        assert_eq!(q.difficulty, None);
        assert_eq!(q.body_part, None);

        let q = search("/workouts/search").unwrap();
        assert!(q.q.is_empty());
        assert_eq!(q.difficulty, None);
    }

    #[test]
    fn search_filters_parse_display_names() {
        let q = search("/workouts/search?difficulty=Hard&body_part=Full%20Body").unwrap();
        assert_eq!(q.difficulty, Some(Difficulty::Hard));
        assert_eq!(q.body_part, Some(BodyPart::FullBody));
        assert!(search("/workouts/search?difficulty=Extreme").is_err());
    }

    #[test]
    fn validate_trims_title_and_dedups_exercises() {
        let id = Uuid::new_v4();
        let mut req = WorkoutRequest {
            title: "  Push  ".into(),
            description: String::new(),
            difficulty: Difficulty::Hard,
            workout_type: WorkoutType::Strength,
            body_part: BodyPart::Chest,
            duration_minutes: 45,
            exercise_ids: vec![id, id],
            image: None,
        };
        req.validate().unwrap();
        assert_eq!(req.title, "Push");
        assert_eq!(req.exercise_ids, vec![id]);

        req.title = "   ".into();
        assert!(req.validate().is_err());
    }
}
