// Trait abstractions for pipeline dependencies.
//
// DocumentStore: the six logical collections behind one seam (staged
//   submissions, published articles, content feed, generation requests,
//   notification log, admin registry).
// CompletionClient: one bounded chat completion per call, no retry.
// PushSender: one topic delivery per call, fire-and-forget.
//
// Each client is constructed once at startup and passed in explicitly,
// so tests substitute mocks: no network, no vendor SDK.

use anyhow::Result;
use async_trait::async_trait;

use ai_client::Message;
use fcm_client::PushMessage;
use matchwire_common::types::{
    AdminUser, GeneratedContent, GenerationRequest, NotificationRecord, PublishedArticle,
    StagedArticle,
};

// ---------------------------------------------------------------------------
// DocumentStore
// ---------------------------------------------------------------------------

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a staged submission by key.
    async fn staged_article(&self, id: &str) -> Result<Option<StagedArticle>>;

    /// Write a staged submission (intake path).
    async fn put_staged(&self, id: &str, article: &StagedArticle) -> Result<()>;

    /// Write the published article under the same key as its staged input.
    async fn put_published(&self, id: &str, article: &PublishedArticle) -> Result<()>;

    /// Append one notification-log record.
    async fn log_notification(&self, record: &NotificationRecord) -> Result<()>;

    /// Look up a caller in the admin registry.
    async fn admin_user(&self, caller_id: &str) -> Result<Option<AdminUser>>;

    /// Reference facts for a sport category, used to enrich generation
    /// prompts. Empty when none are on file.
    async fn reference_facts(&self, sport: &str) -> Result<Vec<String>>;

    /// Create or overwrite a generation-request tracking record.
    async fn put_generation_request(&self, request: &GenerationRequest) -> Result<()>;

    /// Commit a generation batch as one atomic group write.
    /// All items become visible together or not at all. Returns the
    /// assigned ids in item order.
    async fn commit_generated(&self, items: &[GeneratedContent]) -> Result<Vec<String>>;
}

// ---------------------------------------------------------------------------
// CompletionClient
// ---------------------------------------------------------------------------

/// One completion request: role-tagged messages plus sampling and output
/// bounds. Invoked at most once per pipeline input.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the provider for a strict-JSON reply.
    pub json_output: bool,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the reply text of the first choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

#[async_trait]
impl CompletionClient for ai_client::OpenAi {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.chat_completion(
            &request.messages,
            request.temperature,
            request.max_tokens,
            request.json_output,
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// PushSender
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, message: &PushMessage) -> Result<()>;
}

#[async_trait]
impl PushSender for fcm_client::FcmClient {
    async fn send(&self, message: &PushMessage) -> Result<()> {
        self.send(message).await?;
        Ok(())
    }
}

/// No-op sender for deployments without push credentials.
pub struct NoopPush;

#[async_trait]
impl PushSender for NoopPush {
    async fn send(&self, message: &PushMessage) -> Result<()> {
        tracing::debug!(topic = %message.topic, "push disabled, dropping message");
        Ok(())
    }
}
