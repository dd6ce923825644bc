use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use tokio::sync::RwLock;

use crate::{
    config::Config,
    error::{AppError, Result},
    models::NotificationDetails,
};

/// Sends push notifications through the Farcaster client relay.
///
/// Notification endpoints are handed to us by the host via webhook events
/// and kept in a process-local registry. Delivery is fail-soft: a failed
/// send is logged, never surfaced to the webhook caller.
#[derive(Clone)]
pub struct NotificationService {
    config: Config,
    http: reqwest::Client,
    tokens: Arc<RwLock<HashMap<u64, NotificationDetails>>>,
}

impl NotificationService {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn set_details(&self, fid: u64, details: NotificationDetails) {
        let mut tokens = self.tokens.write().await;
        tokens.insert(fid, details);
    }

    pub async fn remove_details(&self, fid: u64) {
        let mut tokens = self.tokens.write().await;
        tokens.remove(&fid);
    }

    pub async fn has_details(&self, fid: u64) -> bool {
        let tokens = self.tokens.read().await;
        tokens.contains_key(&fid)
    }

    /// POSTs one notification to the user's stored relay endpoint.
    pub async fn send(&self, fid: u64, title: &str, body: &str) {
        let details = {
            let tokens = self.tokens.read().await;
            tokens.get(&fid).cloned()
        };

        let Some(details) = details else {
            tracing::debug!("No notification details for user {}", fid);
            return;
        };

        match self.deliver(&details, title, body).await {
            Ok(()) => tracing::info!("Notification sent to user {}", fid),
            Err(e) => tracing::error!("Failed to send notification to user {}: {}", fid, e),
        }
    }

    async fn deliver(&self, details: &NotificationDetails, title: &str, body: &str) -> Result<()> {
        let payload = json!({
            "notificationId": uuid::Uuid::new_v4().to_string(),
            "title": title,
            "body": body,
            "targetUrl": self.config.app_url,
            "tokens": [details.token],
        });

        let response = self.http.post(&details.url).json(&payload).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalAPI(format!(
                "notification relay returned {}: {}",
                status, text
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[tokio::test]
    async fn details_registry_round_trips() {
        let service = NotificationService::new(test_config());
        assert!(!service.has_details(12345).await);

        service
            .set_details(
                12345,
                NotificationDetails {
                    url: "https://relay.example/notify".to_string(),
                    token: "tok".to_string(),
                },
            )
            .await;
        assert!(service.has_details(12345).await);

        service.remove_details(12345).await;
        assert!(!service.has_details(12345).await);
    }

    #[tokio::test]
    async fn send_without_details_is_a_no_op() {
        let service = NotificationService::new(test_config());
        // Must not panic or attempt a network call.
        service.send(999, "Welcome", "Hello").await;
    }
}
