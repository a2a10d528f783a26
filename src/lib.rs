pub mod alert;
pub mod api;
pub mod calendar;
pub mod config;
pub mod editor;
pub mod error;
pub mod models;
pub mod timer;
pub mod version;

pub use api::ApiClient;
pub use editor::{EditorError, EditorOptions, PersistMode, SessionEditor, SessionStore};
pub use error::{AppError, Result};
pub use timer::{RestTimer, TimerSnapshot, TimerState};
