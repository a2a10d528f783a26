use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Response of `GET /analytics/stats?days=N`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutStats {
    #[serde(default)]
    pub total_workouts: u32,
    #[serde(default)]
    pub total_duration_minutes: f64,
    #[serde(default)]
    pub average_duration_minutes: f64,
    #[serde(default)]
    pub workouts_by_day: BTreeMap<String, u32>,
}

impl WorkoutStats {
    pub fn busiest_day(&self) -> Option<(&str, u32)> {
        self.workouts_by_day
            .iter()
            .max_by_key(|(_, count)| **count)
            .map(|(day, count)| (day.as_str(), *count))
    }
}
