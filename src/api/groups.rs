use crate::error::{AppError, Result};
use crate::models::{CompetitionGroup, GroupData, JoinGroup};

use super::ApiClient;

impl ApiClient {
    pub async fn list_groups(&self) -> Result<Vec<CompetitionGroup>> {
        self.get("/groups").await
    }

    pub async fn get_group(&self, id: &str) -> Result<CompetitionGroup> {
        self.get(&format!("/groups/{id}")).await
    }

    pub async fn create_group(&self, data: &GroupData) -> Result<CompetitionGroup> {
        if data.name.trim().is_empty() {
            return Err(AppError::Validation("Group name is required".to_string()));
        }
        let group: CompetitionGroup = self.post("/groups", data).await?;
        tracing::info!("Created group {} ({})", group.name, group.id);
        Ok(group)
    }

    pub async fn join_group(&self, invite_code: &str) -> Result<()> {
        let invite_code = invite_code.trim();
        if invite_code.is_empty() {
            return Err(AppError::Validation("Invite code is required".to_string()));
        }
        let _: serde_json::Value = self.post("/groups/join", &JoinGroup { invite_code }).await?;
        Ok(())
    }

    pub async fn leave_group(&self, id: &str) -> Result<()> {
        let _: serde_json::Value = self.post_empty(&format!("/groups/{id}/leave")).await?;
        tracing::info!("Left group {}", id);
        Ok(())
    }

    /// Owner only.
    pub async fn delete_group(&self, id: &str) -> Result<()> {
        let _: serde_json::Value = self.delete(&format!("/groups/{id}")).await?;
        tracing::info!("Deleted group {}", id);
        Ok(())
    }
}
