//! In-memory document store.
//!
//! The real document database is an external collaborator; this store
//! backs local runs and the test suites. All writes happen under one
//! lock, which is what makes `commit_generated` an atomic group write.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use matchwire_common::types::{
    AdminUser, GeneratedContent, GenerationRequest, NotificationRecord, PublishedArticle,
    StagedArticle,
};

use crate::traits::DocumentStore;

#[derive(Default)]
struct Collections {
    staged: HashMap<String, StagedArticle>,
    published: HashMap<String, PublishedArticle>,
    content_feed: HashMap<String, GeneratedContent>,
    generation_requests: HashMap<String, GenerationRequest>,
    notification_log: Vec<NotificationRecord>,
    admins: HashMap<String, AdminUser>,
    reference_facts: HashMap<String, Vec<String>>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Seeding (builder style) ---

    pub fn with_admin(self, user: AdminUser) -> Self {
        self.inner
            .lock()
            .expect("store lock")
            .admins
            .insert(user.id.clone(), user);
        self
    }

    pub fn with_reference_facts(self, sport: &str, facts: Vec<String>) -> Self {
        self.inner
            .lock()
            .expect("store lock")
            .reference_facts
            .insert(sport.to_string(), facts);
        self
    }

    // --- Inspection ---

    pub fn published(&self, id: &str) -> Option<PublishedArticle> {
        self.inner.lock().expect("store lock").published.get(id).cloned()
    }

    pub fn content_feed_len(&self) -> usize {
        self.inner.lock().expect("store lock").content_feed.len()
    }

    pub fn content_item(&self, id: &str) -> Option<GeneratedContent> {
        self.inner
            .lock()
            .expect("store lock")
            .content_feed
            .get(id)
            .cloned()
    }

    pub fn notifications(&self) -> Vec<NotificationRecord> {
        self.inner
            .lock()
            .expect("store lock")
            .notification_log
            .clone()
    }

    pub fn generation_request(&self, request_id: &str) -> Option<GenerationRequest> {
        self.inner
            .lock()
            .expect("store lock")
            .generation_requests
            .get(request_id)
            .cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn staged_article(&self, id: &str) -> Result<Option<StagedArticle>> {
        Ok(self.inner.lock().expect("store lock").staged.get(id).cloned())
    }

    async fn put_staged(&self, id: &str, article: &StagedArticle) -> Result<()> {
        self.inner
            .lock()
            .expect("store lock")
            .staged
            .insert(id.to_string(), article.clone());
        Ok(())
    }

    async fn put_published(&self, id: &str, article: &PublishedArticle) -> Result<()> {
        self.inner
            .lock()
            .expect("store lock")
            .published
            .insert(id.to_string(), article.clone());
        Ok(())
    }

    async fn log_notification(&self, record: &NotificationRecord) -> Result<()> {
        self.inner
            .lock()
            .expect("store lock")
            .notification_log
            .push(record.clone());
        Ok(())
    }

    async fn admin_user(&self, caller_id: &str) -> Result<Option<AdminUser>> {
        Ok(self
            .inner
            .lock()
            .expect("store lock")
            .admins
            .get(caller_id)
            .cloned())
    }

    async fn reference_facts(&self, sport: &str) -> Result<Vec<String>> {
        Ok(self
            .inner
            .lock()
            .expect("store lock")
            .reference_facts
            .get(sport)
            .cloned()
            .unwrap_or_default())
    }

    async fn put_generation_request(&self, request: &GenerationRequest) -> Result<()> {
        self.inner
            .lock()
            .expect("store lock")
            .generation_requests
            .insert(request.request_id.clone(), request.clone());
        Ok(())
    }

    async fn commit_generated(&self, items: &[GeneratedContent]) -> Result<Vec<String>> {
        let mut inner = self.inner.lock().expect("store lock");
        let ids: Vec<String> = items.iter().map(|_| Uuid::new_v4().to_string()).collect();
        for (id, item) in ids.iter().zip(items) {
            inner.content_feed.insert(id.clone(), item.clone());
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use matchwire_common::types::GeneratedBody;

    fn fact_item(fact: &str) -> GeneratedContent {
        GeneratedContent {
            sport: "golf".to_string(),
            source: "ai".to_string(),
            times_shown: 0,
            likes: 0,
            created_at: Utc::now(),
            body: GeneratedBody::DidYouKnow {
                fact: fact.to_string(),
                details: None,
                category: None,
            },
        }
    }

    #[tokio::test]
    async fn test_commit_generated_assigns_one_id_per_item() {
        let store = MemoryStore::new();
        let ids = store
            .commit_generated(&[fact_item("a"), fact_item("b")])
            .await
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(store.content_feed_len(), 2);
        assert!(store.content_item(&ids[0]).is_some());
    }
}
