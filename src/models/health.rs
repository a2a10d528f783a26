use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Used when the server has no recommendation for the user.
pub const DEFAULT_WATER_GOAL_ML: f64 = 2000.0;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterLog {
    pub amount_ml: u32,
}

impl WaterLog {
    pub fn new(amount_ml: u32) -> Result<Self> {
        if amount_ml == 0 {
            return Err(AppError::Validation(
                "Water amount must be positive".to_string(),
            ));
        }
        Ok(Self { amount_ml })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightLog {
    pub weight: f64,
}

impl WeightLog {
    pub fn new(weight: f64) -> Result<Self> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(AppError::Validation(format!("invalid weight: {weight}")));
        }
        Ok(Self { weight })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterRecommendation {
    #[serde(default)]
    pub recommendation_ml: f64,
}

/// Today's intake against the daily goal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterProgress {
    pub intake_ml: f64,
    pub goal_ml: f64,
}

impl WaterProgress {
    /// `stats` is the `date -> ml` map from `GET /analytics/water/stats`.
    pub fn for_day(
        stats: &BTreeMap<String, f64>,
        recommendation: Option<WaterRecommendation>,
        day: &str,
    ) -> Self {
        let goal_ml = recommendation
            .map(|r| r.recommendation_ml)
            .filter(|ml| *ml > 0.0)
            .unwrap_or(DEFAULT_WATER_GOAL_ML);
        Self {
            intake_ml: stats.get(day).copied().unwrap_or(0.0),
            goal_ml,
        }
    }

    pub fn percent(&self) -> f64 {
        if self.goal_ml <= 0.0 {
            return 0.0;
        }
        self.intake_ml / self.goal_ml * 100.0
    }
}

/// Body of `PUT /auth/me`. Unset fields are left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

impl PasswordChange {
    pub fn new(current: &str, new: &str, confirm: &str) -> Result<Self> {
        if new != confirm {
            return Err(AppError::Validation(
                "The new passwords do not match".to_string(),
            ));
        }
        if new.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "The new password must have at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(Self {
            current_password: current.to_string(),
            new_password: new.to_string(),
        })
    }
}
