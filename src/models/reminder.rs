use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }
}

/// Weekdays are numbered from Sunday = 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrequencyDetails {
    Weekdays(Vec<u8>),
    MonthDay(u8),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub title: String,
    pub time: String,
    pub frequency: Frequency,
    #[serde(default)]
    pub frequency_details: Option<FrequencyDetails>,
    // Only filled in by `GET /reminders/today`
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderData {
    pub title: String,
    pub time: String,
    pub frequency: Frequency,
    pub frequency_details: Option<FrequencyDetails>,
}

impl ReminderData {
    pub fn daily(title: &str, time: &str) -> Result<Self> {
        Self::build(title, time, Frequency::Daily, None)
    }

    pub fn weekly(title: &str, time: &str, weekdays: &[u8]) -> Result<Self> {
        if weekdays.is_empty() {
            return Err(AppError::Validation(
                "Select at least one weekday".to_string(),
            ));
        }
        if let Some(day) = weekdays.iter().find(|d| **d > 6) {
            return Err(AppError::Validation(format!("invalid weekday: {day}")));
        }
        let mut days = weekdays.to_vec();
        days.sort_unstable();
        days.dedup();
        Self::build(title, time, Frequency::Weekly, Some(FrequencyDetails::Weekdays(days)))
    }

    pub fn monthly(title: &str, time: &str, day: u8) -> Result<Self> {
        if !(1..=31).contains(&day) {
            return Err(AppError::Validation(
                "Pick a day of the month between 1 and 31".to_string(),
            ));
        }
        Self::build(title, time, Frequency::Monthly, Some(FrequencyDetails::MonthDay(day)))
    }

    fn build(
        title: &str,
        time: &str,
        frequency: Frequency,
        frequency_details: Option<FrequencyDetails>,
    ) -> Result<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Reminder title is required".to_string()));
        }
        let time = NaiveTime::parse_from_str(time, "%H:%M")
            .map_err(|_| AppError::Validation(format!("invalid time: {time}")))?;
        Ok(Self {
            title: title.to_string(),
            time: time.format("%H:%M").to_string(),
            frequency,
            frequency_details,
        })
    }
}
