use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Response of `GET /analytics/calendar`, keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarMonth {
    #[serde(default)]
    pub calendar_data: BTreeMap<String, Vec<CalendarEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub id: String,
    #[serde(default)]
    pub package_name: String,
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    #[serde(default)]
    pub total_calories: Option<f64>,
    #[serde(default)]
    pub exercise_count: Option<u32>,
}

impl CalendarMonth {
    pub fn entries_on(&self, day: &str) -> &[CalendarEntry] {
        self.calendar_data
            .get(day)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
