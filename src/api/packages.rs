use crate::error::Result;
use crate::models::{JoinPackage, PackageData, WorkoutPackage};

use super::ApiClient;

impl ApiClient {
    pub async fn list_packages(&self) -> Result<Vec<WorkoutPackage>> {
        self.get("/packages").await
    }

    pub async fn list_public_packages(&self) -> Result<Vec<WorkoutPackage>> {
        self.get("/packages/public").await
    }

    pub async fn create_package(&self, data: &PackageData) -> Result<WorkoutPackage> {
        let package: WorkoutPackage = self.post("/packages", data).await?;
        tracing::info!("Created package {} ({})", package.name, package.id);
        Ok(package)
    }

    pub async fn update_package(&self, id: &str, data: &PackageData) -> Result<WorkoutPackage> {
        self.put(&format!("/packages/{id}"), data).await
    }

    pub async fn delete_package(&self, id: &str) -> Result<()> {
        let _: serde_json::Value = self.delete(&format!("/packages/{id}")).await?;
        tracing::info!("Deleted package {}", id);
        Ok(())
    }

    /// Copies a public package into the user's own list.
    pub async fn copy_package(&self, id: &str) -> Result<()> {
        let _: serde_json::Value = self.post_empty(&format!("/packages/{id}/copy")).await?;
        Ok(())
    }

    pub async fn join_package(&self, package_code: &str) -> Result<()> {
        let _: serde_json::Value = self
            .post("/packages/join", &JoinPackage { package_code })
            .await?;
        Ok(())
    }
}
