use crate::error::Result;
use crate::models::{AuthResponse, LoginData, RegisterData, User};

use super::ApiClient;

impl ApiClient {
    /// Logs in and keeps the returned token as this client's credential.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let data = LoginData {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self.post("/auth/login", &data).await?;
        self.set_credential(response.access_token.clone());
        tracing::info!("Logged in as {}", response.user.username);
        Ok(response)
    }

    pub async fn register(&self, data: &RegisterData) -> Result<AuthResponse> {
        let response: AuthResponse = self.post("/auth/register", data).await?;
        self.set_credential(response.access_token.clone());
        tracing::info!("Registered {}", response.user.username);
        Ok(response)
    }

    pub async fn current_user(&self) -> Result<User> {
        self.get("/auth/me").await
    }

    /// Local only; the API keeps no session state for bearer tokens.
    pub fn logout(&self) {
        self.clear_credential();
        tracing::info!("Logged out");
    }
}
