use async_trait::async_trait;

use crate::editor::SessionStore;
use crate::error::Result;
use crate::models::{ExerciseLog, ReplaceExercises, WorkoutSession};

use super::ApiClient;

impl ApiClient {
    pub async fn list_sessions(&self) -> Result<Vec<WorkoutSession>> {
        self.get("/sessions/all").await
    }

    pub async fn get_session(&self, id: &str) -> Result<WorkoutSession> {
        self.get(&format!("/sessions/{id}")).await
    }

    /// Replaces the session's whole exercise log.
    pub async fn replace_exercises(&self, id: &str, exercises: &[ExerciseLog]) -> Result<()> {
        let _: serde_json::Value = self
            .put(&format!("/sessions/{id}"), &ReplaceExercises { exercises })
            .await?;
        Ok(())
    }

    pub async fn complete_session(&self, id: &str) -> Result<()> {
        let _: serde_json::Value = self.post_empty(&format!("/sessions/{id}/complete")).await?;
        tracing::info!("Completed session {}", id);
        Ok(())
    }

    pub async fn delete_session(&self, id: &str) -> Result<()> {
        let _: serde_json::Value = self.delete(&format!("/sessions/{id}")).await?;
        tracing::info!("Deleted session {}", id);
        Ok(())
    }
}

#[async_trait]
impl SessionStore for ApiClient {
    async fn fetch_session(&self, id: &str) -> Result<WorkoutSession> {
        self.get_session(id).await
    }

    async fn replace_exercises(&self, id: &str, exercises: &[ExerciseLog]) -> Result<()> {
        ApiClient::replace_exercises(self, id, exercises).await
    }

    async fn complete_session(&self, id: &str) -> Result<()> {
        ApiClient::complete_session(self, id).await
    }

    async fn delete_session(&self, id: &str) -> Result<()> {
        ApiClient::delete_session(self, id).await
    }
}
