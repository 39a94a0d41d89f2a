//! PostgREST-backed task store.
//!
//! Calls carry the project `apikey` plus the owner's own access token as the
//! bearer credential, so the store's row-level policy applies on top of the
//! explicit owner filter.

use reqwest::Client;

use super::{StoreError, Task, TaskStore};
use crate::auth::Owner;

/// Task store backed by the hosted PostgREST table API.
pub struct SupabaseTaskStore {
    client: Client,
    url: String,
    anon_key: String,
}

impl SupabaseTaskStore {
    /// Create a new PostgREST task store.
    pub fn new(url: &str, anon_key: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    /// Get the PostgREST URL.
    fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url)
    }
}

#[async_trait::async_trait]
impl TaskStore for SupabaseTaskStore {
    async fn list(&self, owner: &Owner) -> Result<Vec<Task>, StoreError> {
        let resp = self
            .client
            .get(format!(
                "{}/todos?select=*&user_id=eq.{}&order=id.desc",
                self.rest_url(),
                owner.user_id()
            ))
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", owner.access_token()))
            .send()
            .await
            .map_err(StoreError::network)?;

        let status = resp.status();
        let text = resp.text().await.map_err(StoreError::network)?;

        if !status.is_success() {
            return Err(StoreError::from_response(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(StoreError::parse)
    }

    async fn create(&self, owner: &Owner, title: &str) -> Result<(), StoreError> {
        let body = serde_json::json!({
            "title": title,
            "user_id": owner.user_id(),
        });

        let resp = self
            .client
            .post(format!("{}/todos", self.rest_url()))
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", owner.access_token()))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=minimal")
            .json(&body)
            .send()
            .await
            .map_err(StoreError::network)?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.map_err(StoreError::network)?;
            return Err(StoreError::from_response(status.as_u16(), &text));
        }

        Ok(())
    }

    async fn set_completed(
        &self,
        owner: &Owner,
        id: i64,
        completed: bool,
    ) -> Result<(), StoreError> {
        let body = serde_json::json!({ "completed": completed });

        let resp = self
            .client
            .patch(format!(
                "{}/todos?id=eq.{}&user_id=eq.{}",
                self.rest_url(),
                id,
                owner.user_id()
            ))
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", owner.access_token()))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(StoreError::network)?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.map_err(StoreError::network)?;
            return Err(StoreError::from_response(status.as_u16(), &text));
        }

        Ok(())
    }

    async fn remove(&self, owner: &Owner, id: i64) -> Result<(), StoreError> {
        let resp = self
            .client
            .delete(format!(
                "{}/todos?id=eq.{}&user_id=eq.{}",
                self.rest_url(),
                id,
                owner.user_id()
            ))
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", owner.access_token()))
            .send()
            .await
            .map_err(StoreError::network)?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.map_err(StoreError::network)?;
            return Err(StoreError::from_response(status.as_u16(), &text));
        }

        Ok(())
    }
}
