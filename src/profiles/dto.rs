use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::gamification::{repo::AwardedBadge, Streak};

use super::repo::Profile;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub bio: String,
    pub avatar: Option<String>,
    #[serde(default)]
    pub fitness_goals: String,
    pub height_cm: Option<u16>,
    pub weight_kg: Option<u16>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if matches!(self.height_cm, Some(h) if h > 300) {
            return Err(AppError::validation("height_cm must be at most 300"));
        }
        if matches!(self.weight_kg, Some(w) if w > 700) {
            return Err(AppError::validation("weight_kg must be at most 700"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub profile: Profile,
    pub streak: Option<Streak>,
    pub badges: Vec<AwardedBadge>,
}
