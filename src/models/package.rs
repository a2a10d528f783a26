use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseInPackage {
    pub exercise_id: String,
    pub order: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPackage {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub exercises: Vec<ExerciseInPackage>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl WorkoutPackage {
    pub fn exercise_ids(&self) -> Vec<&str> {
        let mut entries: Vec<&ExerciseInPackage> = self.exercises.iter().collect();
        entries.sort_by_key(|e| e.order);
        entries.iter().map(|e| e.exercise_id.as_str()).collect()
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id)
    }
}

/// Body of `POST /packages` and `PUT /packages/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageData {
    pub name: String,
    pub description: Option<String>,
    pub exercises: Vec<ExerciseInPackage>,
    pub is_public: bool,
}

impl PackageData {
    /// Orders the selection `1..=n`, keeping notes from `existing` for exercises it already had.
    pub fn from_selection(
        name: &str,
        description: &str,
        selected: &[String],
        is_public: bool,
        existing: Option<&WorkoutPackage>,
    ) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Package name is required".to_string()));
        }
        if selected.is_empty() {
            return Err(AppError::Validation(
                "Select at least one exercise".to_string(),
            ));
        }

        let exercises = selected
            .iter()
            .enumerate()
            .map(|(index, exercise_id)| ExerciseInPackage {
                exercise_id: exercise_id.clone(),
                order: index as u32 + 1,
                notes: existing.and_then(|pkg| {
                    pkg.exercises
                        .iter()
                        .find(|e| &e.exercise_id == exercise_id)
                        .and_then(|e| e.notes.clone())
                }),
            })
            .collect();

        let description = description.trim();
        Ok(Self {
            name: name.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            exercises,
            is_public,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinPackage<'a> {
    pub package_code: &'a str,
}
