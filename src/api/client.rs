use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::version;

/// Clones share the connection pool and the credential.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Arc<str>,
    credential: Arc<RwLock<Option<String>>>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl ApiClient {
    pub fn new(base_url: &str, credential: Option<String>) -> Result<Self> {
        Self::with_timeout(base_url, credential, Duration::from_secs(30))
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_timeout(&config.api_url, config.token.clone(), config.http_timeout)
    }

    fn with_timeout(base_url: &str, credential: Option<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config(format!("invalid API URL: {base_url}")));
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(version::user_agent())
            .build()?;

        Ok(Self {
            http,
            base_url: Arc::from(base_url),
            credential: Arc::new(RwLock::new(credential)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_credential(&self, token: impl Into<String>) {
        *self.credential.write() = Some(token.into());
    }

    pub fn clear_credential(&self) {
        *self.credential.write() = None;
    }

    pub fn has_credential(&self) -> bool {
        self.credential.read().is_some()
    }

    pub fn credential(&self) -> Option<String> {
        self.credential.read().clone()
    }

    pub async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = self.credential() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(self.error_for(&method, path, status, &bytes));
        }

        // Empty bodies (204s, bare DELETEs) decode as `null`
        let payload: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };
        Ok(serde_json::from_slice(payload)?)
    }

    fn error_for(&self, method: &Method, path: &str, status: StatusCode, body: &[u8]) -> AppError {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|body| {
                body.message.or(match body.detail {
                    Some(serde_json::Value::String(detail)) => Some(detail),
                    Some(other) => Some(other.to_string()),
                    None => None,
                })
            })
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

        match status {
            // Credential exchanges answer 401 for a bad password, not an expired token
            StatusCode::UNAUTHORIZED
                if path.starts_with("/auth/login") || path.starts_with("/auth/register") =>
            {
                AppError::InvalidCredentials(message)
            }
            StatusCode::UNAUTHORIZED => {
                tracing::warn!("{} {} rejected credential, logging out", method, path);
                self.clear_credential();
                AppError::Unauthorized
            }
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            _ => {
                tracing::debug!("{} {} failed with {}: {}", method, path, status, message);
                AppError::Api { status, message }
            }
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<T, ()>(Method::POST, path, None).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<T, ()>(Method::DELETE, path, None).await
    }
}
