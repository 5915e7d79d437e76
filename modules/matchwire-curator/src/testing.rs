// Test doubles for the pipeline trait boundaries.
//
// Two mocks plus helpers:
// - MockCompletion (CompletionClient): scripted replies/failures, FIFO,
//   with every request recorded for "no external call" assertions.
// - MockPush (PushSender): records sent messages; per-topic failure
//   injection.
//
// The stateful store double is `store::MemoryStore` itself, which is the
// real in-memory implementation.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use fcm_client::PushMessage;
use matchwire_common::types::{
    AdminUser, GeneratedContent, GenerationRequest, NotificationRecord, PublishedArticle,
    StagedArticle,
};

use crate::traits::{CompletionClient, CompletionRequest, DocumentStore, PushSender};

// ---------------------------------------------------------------------------
// MockCompletion
// ---------------------------------------------------------------------------

/// Scripted completion client. Replies are consumed front to back; an
/// unscripted call fails loudly.
#[derive(Default)]
pub struct MockCompletion {
    replies: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.replies
            .lock()
            .expect("mock lock")
            .push_back(Ok(text.into()));
        self
    }

    pub fn fail(self, message: impl Into<String>) -> Self {
        self.replies
            .lock()
            .expect("mock lock")
            .push_back(Err(message.into()));
        self
    }

    /// Requests seen so far.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().expect("mock lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock lock").len()
    }
}

#[async_trait]
impl CompletionClient for MockCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.calls.lock().expect("mock lock").push(request.clone());
        match self.replies.lock().expect("mock lock").pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("MockCompletion: no scripted reply left")),
        }
    }
}

// ---------------------------------------------------------------------------
// MockPush
// ---------------------------------------------------------------------------

/// Recording push sender with per-topic failure injection.
#[derive(Default)]
pub struct MockPush {
    sent: Mutex<Vec<PushMessage>>,
    fail_topics: HashSet<String>,
}

impl MockPush {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_topic(mut self, topic: &str) -> Self {
        self.fail_topics.insert(topic.to_string());
        self
    }

    pub fn sent(&self) -> Vec<PushMessage> {
        self.sent.lock().expect("mock lock").clone()
    }
}

#[async_trait]
impl PushSender for MockPush {
    async fn send(&self, message: &PushMessage) -> Result<()> {
        if self.fail_topics.contains(&message.topic) {
            return Err(anyhow!("MockPush: injected failure for {}", message.topic));
        }
        self.sent.lock().expect("mock lock").push(message.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FailingStore
// ---------------------------------------------------------------------------

/// Store whose writes always fail. Reads succeed with empty results so
/// a pipeline reaches its write before hitting the failure. The admin
/// registry is seedable so the generation auth gate can be passed.
#[derive(Default)]
pub struct FailingStore {
    admins: Vec<AdminUser>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_admin(mut self, user: AdminUser) -> Self {
        self.admins.push(user);
        self
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn staged_article(&self, _id: &str) -> Result<Option<StagedArticle>> {
        Ok(None)
    }

    async fn put_staged(&self, _id: &str, _article: &StagedArticle) -> Result<()> {
        Err(anyhow!("FailingStore: write refused"))
    }

    async fn put_published(&self, _id: &str, _article: &PublishedArticle) -> Result<()> {
        Err(anyhow!("FailingStore: write refused"))
    }

    async fn log_notification(&self, _record: &NotificationRecord) -> Result<()> {
        Err(anyhow!("FailingStore: write refused"))
    }

    async fn admin_user(&self, caller_id: &str) -> Result<Option<AdminUser>> {
        Ok(self.admins.iter().find(|u| u.id == caller_id).cloned())
    }

    async fn reference_facts(&self, _sport: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn put_generation_request(&self, _request: &GenerationRequest) -> Result<()> {
        Err(anyhow!("FailingStore: write refused"))
    }

    async fn commit_generated(&self, _items: &[GeneratedContent]) -> Result<Vec<String>> {
        Err(anyhow!("FailingStore: write refused"))
    }
}

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

pub fn staged_article(title: &str, summary: &str, content: &str) -> StagedArticle {
    StagedArticle {
        title: Some(title.to_string()),
        summary: Some(summary.to_string()),
        content: Some(content.to_string()),
        sport: Some("football".to_string()),
        ..Default::default()
    }
}

pub fn active_admin(id: &str) -> AdminUser {
    AdminUser {
        id: id.to_string(),
        role: "admin".to_string(),
        active: true,
        name: None,
    }
}
