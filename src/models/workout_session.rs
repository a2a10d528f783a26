use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::exercise::{Exercise, ExerciseType};
use super::timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(default)]
    pub package_name: String,
    #[serde(default)]
    pub exercises: Vec<ExerciseLog>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub start_time: DateTime<Utc>,
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    #[serde(default)]
    pub total_calories: Option<f64>,
    #[serde(default)]
    pub exercise_count: Option<u32>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct ReplaceExercises<'a> {
    pub exercises: &'a [ExerciseLog],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthSet {
    pub set_number: u32,
    pub weight: f64,
    pub reps: u32,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardioSet {
    pub duration_minutes: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incline: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default)]
    pub completed: bool,
}

/// Sets of one exercise; the variant is the exercise type, so shapes never mix.
#[derive(Debug, Clone, PartialEq)]
pub enum SetLog {
    Strength(Vec<StrengthSet>),
    Cardio(Vec<CardioSet>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SetLogError {
    #[error("set index out of range")]
    OutOfRange,
    #[error("set fields do not match the exercise type")]
    TypeMismatch,
}

impl SetLog {
    pub fn empty(exercise_type: ExerciseType) -> Self {
        match exercise_type {
            ExerciseType::Strength => SetLog::Strength(Vec::new()),
            ExerciseType::Cardio => SetLog::Cardio(Vec::new()),
        }
    }

    pub fn exercise_type(&self) -> ExerciseType {
        match self {
            SetLog::Strength(_) => ExerciseType::Strength,
            SetLog::Cardio(_) => ExerciseType::Cardio,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SetLog::Strength(sets) => sets.len(),
            SetLog::Cardio(sets) => sets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn completed_count(&self) -> usize {
        match self {
            SetLog::Strength(sets) => sets.iter().filter(|s| s.completed).count(),
            SetLog::Cardio(sets) => sets.iter().filter(|s| s.completed).count(),
        }
    }

    pub fn is_completed(&self, index: usize) -> Option<bool> {
        match self {
            SetLog::Strength(sets) => sets.get(index).map(|s| s.completed),
            SetLog::Cardio(sets) => sets.get(index).map(|s| s.completed),
        }
    }

    pub fn push_blank(&mut self, completed: bool) {
        match self {
            SetLog::Strength(sets) => {
                let set_number = sets.len() as u32 + 1;
                sets.push(StrengthSet {
                    set_number,
                    weight: 0.0,
                    reps: 0,
                    completed,
                });
            }
            SetLog::Cardio(sets) => sets.push(CardioSet {
                duration_minutes: 0.0,
                distance: None,
                incline: None,
                speed: None,
                completed,
            }),
        }
    }

    /// Removes a set. Strength sets are renumbered `1..=len` afterwards.
    pub fn remove(&mut self, index: usize) -> Result<(), SetLogError> {
        if index >= self.len() {
            return Err(SetLogError::OutOfRange);
        }
        match self {
            SetLog::Strength(sets) => {
                sets.remove(index);
                for (i, set) in sets.iter_mut().enumerate() {
                    set.set_number = i as u32 + 1;
                }
            }
            SetLog::Cardio(sets) => {
                sets.remove(index);
            }
        }
        Ok(())
    }

    pub fn toggle(&mut self, index: usize) -> Result<bool, SetLogError> {
        let completed = match self {
            SetLog::Strength(sets) => sets.get_mut(index).map(|s| &mut s.completed),
            SetLog::Cardio(sets) => sets.get_mut(index).map(|s| &mut s.completed),
        }
        .ok_or(SetLogError::OutOfRange)?;
        *completed = !*completed;
        Ok(*completed)
    }

    pub fn apply(&mut self, index: usize, patch: &SetPatch) -> Result<(), SetLogError> {
        match (self, patch) {
            (SetLog::Strength(sets), SetPatch::Strength(patch)) => {
                sets.get_mut(index)
                    .ok_or(SetLogError::OutOfRange)?
                    .apply(patch);
                Ok(())
            }
            (SetLog::Cardio(sets), SetPatch::Cardio(patch)) => {
                sets.get_mut(index)
                    .ok_or(SetLogError::OutOfRange)?
                    .apply(patch);
                Ok(())
            }
            _ => Err(SetLogError::TypeMismatch),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrengthPatch {
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Optional metrics take `Some(None)` to clear the value and `None` to keep it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardioPatch {
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub distance: Option<Option<f64>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub incline: Option<Option<f64>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub speed: Option<Option<f64>>,
    #[serde(default)]
    pub completed: Option<bool>,
}

// A present `null` means "clear", so it must not collapse into "absent".
fn clearable<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetPatch {
    Strength(StrengthPatch),
    Cardio(CardioPatch),
}

impl From<StrengthPatch> for SetPatch {
    fn from(patch: StrengthPatch) -> Self {
        SetPatch::Strength(patch)
    }
}

impl From<CardioPatch> for SetPatch {
    fn from(patch: CardioPatch) -> Self {
        SetPatch::Cardio(patch)
    }
}

impl StrengthSet {
    pub fn apply(&mut self, patch: &StrengthPatch) {
        if let Some(weight) = patch.weight {
            self.weight = weight;
        }
        if let Some(reps) = patch.reps {
            self.reps = reps;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

impl CardioSet {
    pub fn apply(&mut self, patch: &CardioPatch) {
        if let Some(duration) = patch.duration_minutes {
            self.duration_minutes = duration;
        }
        if let Some(distance) = patch.distance {
            self.distance = distance;
        }
        if let Some(incline) = patch.incline {
            self.incline = incline;
        }
        if let Some(speed) = patch.speed {
            self.speed = speed;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExerciseLog", into = "RawExerciseLog")]
pub struct ExerciseLog {
    pub exercise_id: String,
    pub exercise_name: String,
    pub sets: SetLog,
    pub notes: Option<String>,
}

impl ExerciseLog {
    pub fn for_exercise(exercise: &Exercise) -> Self {
        Self {
            exercise_id: exercise.id.clone(),
            exercise_name: exercise.name.clone(),
            sets: SetLog::empty(exercise.exercise_type),
            notes: None,
        }
    }

    pub fn exercise_type(&self) -> ExerciseType {
        self.sets.exercise_type()
    }
}

// Wire shape: `type` next to an untyped `sets` array
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawExerciseLog {
    exercise_id: String,
    exercise_name: String,
    #[serde(rename = "type")]
    exercise_type: ExerciseType,
    #[serde(default)]
    sets: Vec<serde_json::Value>,
    #[serde(default)]
    notes: Option<String>,
}

impl TryFrom<RawExerciseLog> for ExerciseLog {
    type Error = serde_json::Error;

    fn try_from(raw: RawExerciseLog) -> Result<Self, Self::Error> {
        let sets = match raw.exercise_type {
            ExerciseType::Strength => SetLog::Strength(
                raw.sets
                    .into_iter()
                    .map(serde_json::from_value)
                    .collect::<Result<_, _>>()?,
            ),
            ExerciseType::Cardio => SetLog::Cardio(
                raw.sets
                    .into_iter()
                    .map(serde_json::from_value)
                    .collect::<Result<_, _>>()?,
            ),
        };
        Ok(Self {
            exercise_id: raw.exercise_id,
            exercise_name: raw.exercise_name,
            sets,
            notes: raw.notes,
        })
    }
}

impl From<ExerciseLog> for RawExerciseLog {
    fn from(log: ExerciseLog) -> Self {
        let exercise_type = log.exercise_type();
        let sets = match log.sets {
            SetLog::Strength(sets) => sets.into_iter().map(to_value).collect(),
            SetLog::Cardio(sets) => sets.into_iter().map(to_value).collect(),
        };
        Self {
            exercise_id: log.exercise_id,
            exercise_name: log.exercise_name,
            exercise_type,
            sets,
            notes: log.notes,
        }
    }
}

fn to_value<T: Serialize>(set: T) -> serde_json::Value {
    // Plain structs of numbers and bools always serialize
    serde_json::to_value(set).unwrap_or(serde_json::Value::Null)
}
