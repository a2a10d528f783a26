pub mod analytics;
pub mod calendar;
pub mod exercise;
pub mod group;
pub mod health;
pub mod package;
pub mod reminder;
pub mod timestamp;
pub mod user;
pub mod workout_session;

pub use analytics::WorkoutStats;
pub use calendar::{CalendarEntry, CalendarMonth};
pub use exercise::{Exercise, ExerciseType};
pub use group::{CompetitionGroup, GroupData, GroupMember, JoinGroup};
pub use health::{
    PasswordChange, ProfileUpdate, WaterLog, WaterProgress, WaterRecommendation, WeightLog,
};
pub use package::{ExerciseInPackage, JoinPackage, PackageData, WorkoutPackage};
pub use reminder::{Frequency, FrequencyDetails, Reminder, ReminderData};
pub use user::{AuthResponse, LoginData, RegisterData, User};
pub use workout_session::{
    CardioPatch, CardioSet, ExerciseLog, ReplaceExercises, SetLog, SetLogError, SetPatch,
    StrengthPatch, StrengthSet, WorkoutSession,
};
