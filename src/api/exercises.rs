use crate::error::Result;
use crate::models::Exercise;

use super::ApiClient;

impl ApiClient {
    pub async fn list_exercises(&self) -> Result<Vec<Exercise>> {
        self.get("/exercises").await
    }
}
