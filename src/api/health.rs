use std::collections::BTreeMap;

use crate::error::{AppError, Result};
use crate::models::{PasswordChange, ProfileUpdate, User, WaterLog, WaterRecommendation, WeightLog};

use super::ApiClient;

impl ApiClient {
    pub async fn log_water(&self, log: WaterLog) -> Result<()> {
        let _: serde_json::Value = self.post("/water", &log).await?;
        tracing::info!("Logged {} ml of water", log.amount_ml);
        Ok(())
    }

    pub async fn log_weight(&self, log: WeightLog) -> Result<()> {
        let _: serde_json::Value = self.post("/weight", &log).await?;
        tracing::info!("Logged weight {} kg", log.weight);
        Ok(())
    }

    /// Millilitres per day for the last `days` days, keyed by `YYYY-MM-DD`.
    pub async fn water_stats(&self, days: u32) -> Result<BTreeMap<String, f64>> {
        if days == 0 {
            return Err(AppError::Validation("days must be at least 1".to_string()));
        }
        self.get(&format!("/analytics/water/stats?days={days}")).await
    }

    pub async fn water_recommendation(&self) -> Result<WaterRecommendation> {
        self.get("/analytics/water/recommendation").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        self.put("/auth/me", update).await
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<()> {
        let _: serde_json::Value = self.post("/auth/me/change-password", change).await?;
        tracing::info!("Password changed");
        Ok(())
    }
}
