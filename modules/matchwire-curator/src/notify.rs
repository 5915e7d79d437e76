//! Notification composition and topic routing.
//!
//! One delivery attempt per topic, one log record per attempt. A push
//! failure is recorded and skipped, never bubbled into the pipeline.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use fcm_client::PushMessage;
use tracing::{info, warn};

use matchwire_common::sport::{display_name, sport_topic};
use matchwire_common::text::fit_to_budget;
use matchwire_common::types::{GeneratedContent, NotificationRecord, PublishedArticle};

use crate::traits::{DocumentStore, PushSender};

/// Constant general-audience topic.
pub const GENERAL_TOPIC: &str = "sports_news";

/// Character budget for the underlying text of a notification title,
/// before the category label is prepended.
pub const TITLE_BUDGET: usize = 45;
/// Character budget for the notification body.
pub const BODY_BUDGET: usize = 100;

/// Topic routing policy. Both appear in this pipeline's history; this is
/// deployment configuration, not a merged behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopicPolicy {
    /// Deliver to every computed topic.
    FanOut,
    /// Collapse to the single most specific topic:
    /// content type > sport > general.
    #[default]
    MostSpecific,
}

pub struct NotificationComposer {
    store: Arc<dyn DocumentStore>,
    push: Arc<dyn PushSender>,
    policy: TopicPolicy,
}

impl NotificationComposer {
    pub fn new(store: Arc<dyn DocumentStore>, push: Arc<dyn PushSender>) -> Self {
        Self {
            store,
            push,
            policy: TopicPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: TopicPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Trigger: a just-published article.
    pub async fn notify_article(
        &self,
        article_id: &str,
        article: &PublishedArticle,
    ) -> Result<Vec<NotificationRecord>> {
        let title = match article.sport.as_deref() {
            Some(sport) => format!(
                "{}: {}",
                display_name(sport),
                fit_to_budget(&article.title, TITLE_BUDGET)
            ),
            None => fit_to_budget(&article.title, TITLE_BUDGET).into_owned(),
        };
        let body = fit_to_budget(&article.description, BODY_BUDGET).into_owned();

        // general < sport
        let mut topics = vec![GENERAL_TOPIC.to_string()];
        if let Some(sport) = article.sport.as_deref() {
            topics.push(sport_topic(sport));
        }

        let mut data = BTreeMap::new();
        data.insert("record_id".to_string(), article_id.to_string());
        data.insert("target_screen".to_string(), "article_detail".to_string());
        if let Some(sport) = article.sport.as_deref() {
            data.insert("category".to_string(), sport.to_string());
        }
        data.insert("sent_at".to_string(), Utc::now().to_rfc3339());

        self.deliver(article_id, topics, title, body, data).await
    }

    /// Trigger: a just-created generated content item.
    pub async fn notify_generated(
        &self,
        content_id: &str,
        item: &GeneratedContent,
    ) -> Result<Vec<NotificationRecord>> {
        let title = format!(
            "{}: {}",
            display_name(&item.sport),
            fit_to_budget(item.body.headline(), TITLE_BUDGET)
        );
        let body = fit_to_budget(item.body.headline(), BODY_BUDGET).into_owned();

        // general < sport < content type
        let topics = vec![
            GENERAL_TOPIC.to_string(),
            sport_topic(&item.sport),
            format!("content_{}", item.body.type_tag()),
        ];

        let mut data = BTreeMap::new();
        data.insert("record_id".to_string(), content_id.to_string());
        data.insert("target_screen".to_string(), "content_feed".to_string());
        data.insert("category".to_string(), item.sport.clone());
        data.insert("content_type".to_string(), item.body.type_tag().to_string());
        data.insert("sent_at".to_string(), Utc::now().to_rfc3339());

        self.deliver(content_id, topics, title, body, data).await
    }

    /// Apply the topic policy, then one send + one log record per topic.
    async fn deliver(
        &self,
        record_id: &str,
        topics: Vec<String>,
        title: String,
        body: String,
        data: BTreeMap<String, String>,
    ) -> Result<Vec<NotificationRecord>> {
        let topics = match self.policy {
            TopicPolicy::FanOut => topics,
            // Topics are ordered least to most specific.
            TopicPolicy::MostSpecific => topics.into_iter().last().into_iter().collect(),
        };

        let mut records = Vec::with_capacity(topics.len());
        for topic in topics {
            let message = PushMessage::to_topic(&topic, &title, &body)
                .data(data.clone())
                .high_priority(Some(record_id.to_string()));

            let outcome = self.push.send(&message).await;
            let record = NotificationRecord {
                topic: topic.clone(),
                title: title.clone(),
                body: body.clone(),
                data: data.clone(),
                sent: outcome.is_ok(),
                error: outcome.as_ref().err().map(|e| e.to_string()),
                created_at: Utc::now(),
            };

            match &outcome {
                Ok(()) => info!(record_id, topic, "notification sent"),
                Err(err) => warn!(record_id, topic, error = %err, "notification send failed"),
            }

            // The log write is the one fatal step here.
            self.store.log_notification(&record).await?;
            records.push(record);
        }

        Ok(records)
    }
}
