use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Login rejected: {0}")]
    InvalidCredentials(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Short message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Http(e) => {
                tracing::error!("HTTP error: {:?}", e);
                "Could not reach the server".to_string()
            }
            AppError::Api { message, .. } => message.clone(),
            AppError::Unauthorized => "Your session has expired, please log in again".to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::InvalidCredentials(msg) => msg.clone(),
            AppError::Decode(e) => {
                tracing::error!("Decode error: {:?}", e);
                "Unexpected response from the server".to_string()
            }
            AppError::Config(msg) | AppError::Validation(msg) => msg.clone(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AppError::Http(e) => e.status(),
            AppError::Api { status, .. } => Some(*status),
            AppError::Unauthorized | AppError::InvalidCredentials(_) => {
                Some(StatusCode::UNAUTHORIZED)
            }
            AppError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            AppError::Decode(_) | AppError::Config(_) | AppError::Validation(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
