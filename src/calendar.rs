use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

use crate::models::WorkoutSession;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub id: String,
    pub package_name: String,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: Option<f64>,
    pub total_calories: Option<f64>,
    pub exercise_count: usize,
    pub is_completed: bool,
}

impl From<&WorkoutSession> for SessionSummary {
    fn from(session: &WorkoutSession) -> Self {
        Self {
            id: session.id.clone(),
            package_name: session.package_name.clone(),
            start_time: session.start_time,
            duration_minutes: session.duration_minutes,
            total_calories: session.total_calories,
            exercise_count: session
                .exercise_count
                .map(|c| c as usize)
                .unwrap_or(session.exercises.len()),
            is_completed: session.is_completed,
        }
    }
}

pub type WorkoutsByDay = BTreeMap<NaiveDate, Vec<SessionSummary>>;

/// Buckets sessions by the local date they started on.
pub fn group_by_day<'a, I>(sessions: I) -> WorkoutsByDay
where
    I: IntoIterator<Item = &'a WorkoutSession>,
{
    group_by_day_in(sessions, &Local)
}

pub fn group_by_day_in<'a, I, Tz>(sessions: I, tz: &Tz) -> WorkoutsByDay
where
    I: IntoIterator<Item = &'a WorkoutSession>,
    Tz: TimeZone,
{
    let mut days = WorkoutsByDay::new();
    for session in sessions {
        let day = session.start_time.with_timezone(tz).date_naive();
        days.entry(day).or_default().push(SessionSummary::from(session));
    }
    for bucket in days.values_mut() {
        bucket.sort_by_key(|s| s.start_time);
    }
    days
}

pub fn workouts_on(days: &WorkoutsByDay, day: NaiveDate) -> &[SessionSummary] {
    days.get(&day).map(Vec::as_slice).unwrap_or(&[])
}
