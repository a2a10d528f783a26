pub mod auth;
pub mod calendar;
pub mod client;
pub mod exercises;
pub mod groups;
pub mod health;
pub mod packages;
pub mod reminders;
pub mod sessions;

pub use client::ApiClient;
