use crate::error::Result;
use crate::models::{Reminder, ReminderData};

use super::ApiClient;

impl ApiClient {
    pub async fn list_reminders(&self) -> Result<Vec<Reminder>> {
        self.get("/reminders").await
    }

    pub async fn todays_reminders(&self) -> Result<Vec<Reminder>> {
        self.get("/reminders/today").await
    }

    pub async fn create_reminder(&self, data: &ReminderData) -> Result<Reminder> {
        self.post("/reminders", data).await
    }

    pub async fn update_reminder(&self, id: &str, data: &ReminderData) -> Result<Reminder> {
        self.put(&format!("/reminders/{id}"), data).await
    }

    pub async fn delete_reminder(&self, id: &str) -> Result<()> {
        let _: serde_json::Value = self.delete(&format!("/reminders/{id}")).await?;
        Ok(())
    }
}
