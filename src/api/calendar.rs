use crate::error::{AppError, Result};
use crate::models::{CalendarMonth, WorkoutStats};

use super::ApiClient;

impl ApiClient {
    pub async fn calendar_month(&self, year: i32, month: u32) -> Result<CalendarMonth> {
        if !(1..=12).contains(&month) {
            return Err(AppError::Validation(format!("invalid month: {month}")));
        }
        self.get(&format!("/analytics/calendar?year={year}&month={month}"))
            .await
    }

    pub async fn workout_stats(&self, days: u32) -> Result<WorkoutStats> {
        if days == 0 {
            return Err(AppError::Validation("days must be at least 1".to_string()));
        }
        self.get(&format!("/analytics/stats?days={days}")).await
    }
}
