pub mod error;
pub mod types;

pub use error::{FcmError, Result};
pub use types::{AndroidConfig, Notification, Priority, PushMessage, SendResponse};

use serde_json::json;
use tracing::debug;

const BASE_URL: &str = "https://fcm.googleapis.com";

/// Client for the topic-based push messaging HTTP API.
///
/// Fire-and-forget per call: one request per topic per attempt, no retry.
pub struct FcmClient {
    http: reqwest::Client,
    project_id: String,
    token: String,
    base_url: String,
}

impl FcmClient {
    pub fn new(project_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            project_id: project_id.into(),
            token: token.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Send one message. Returns the server-assigned message name.
    pub async fn send(&self, message: &PushMessage) -> Result<String> {
        let url = format!(
            "{}/v1/projects/{}/messages:send",
            self.base_url, self.project_id
        );

        debug!(topic = %message.topic, "push send");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&json!({ "message": message }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FcmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let sent: SendResponse = resp.json().await?;
        Ok(sent.name)
    }
}
