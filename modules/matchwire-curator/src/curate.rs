//! The curation pipeline: staged submission in, publishable article out.
//!
//! The contract is that a valid staged record always yields exactly one
//! published record. When the model call fails, the original fields are
//! published instead, budget-enforced the same way, with an operator
//! facing failure marker. Only a store write failure propagates.

use std::sync::Arc;

use ai_client::Message;
use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use matchwire_common::text::fit_to_budget;
use matchwire_common::types::{ArticleStatus, PublishedArticle, StagedArticle};

use crate::parse::extract_labels;
use crate::prompt::{curation_prompt, PromptVariant};
use crate::traits::{CompletionClient, CompletionRequest, DocumentStore};

/// Hard cap on the published title, above what the prompt asks for.
pub const TITLE_BUDGET: usize = 80;
/// Card description budget (two lines on a phone).
pub const DESCRIPTION_BUDGET: usize = 120;
/// Detail-page summary budget.
pub const SUMMARY_BUDGET: usize = 300;

const CURATION_TEMPERATURE: f32 = 0.7;
const CURATION_MAX_TOKENS: u32 = 500;

pub struct CurationPipeline {
    store: Arc<dyn DocumentStore>,
    completion: Arc<dyn CompletionClient>,
    variant: PromptVariant,
}

impl CurationPipeline {
    pub fn new(store: Arc<dyn DocumentStore>, completion: Arc<dyn CompletionClient>) -> Self {
        Self {
            store,
            completion,
            variant: PromptVariant::default(),
        }
    }

    pub fn with_variant(mut self, variant: PromptVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Entry point for the staged-record-created trigger.
    ///
    /// Returns `Ok(None)` when the input is missing a required field
    /// (logged skip, no external call, no record). Store failure is the
    /// only error this propagates.
    pub async fn run(&self, id: &str, staged: &StagedArticle) -> Result<Option<PublishedArticle>> {
        let Some((title, summary, content)) = self.required_fields(id, staged) else {
            return Ok(None);
        };

        let prompt = curation_prompt(self.variant, title, summary, content);
        let request = CompletionRequest {
            messages: vec![Message::user(prompt)],
            temperature: CURATION_TEMPERATURE,
            max_tokens: CURATION_MAX_TOKENS,
            json_output: false,
        };

        // At most one model call per input; any failure takes the
        // fallback path instead of retrying.
        let article = match self.completion.complete(&request).await {
            Ok(reply) => self.assemble_curated(staged, title, summary, content, &reply),
            Err(err) => {
                warn!(id, error = %err, "curation failed, publishing original fields");
                self.assemble_fallback(staged, title, summary, content, &err.to_string())
            }
        };

        self.store.put_published(id, &article).await?;
        info!(
            id,
            curation_failed = article.curation_failed,
            "article published"
        );
        Ok(Some(article))
    }

    /// Presence check. Empty-after-trim counts as missing, matching what
    /// the submission clients actually send.
    fn required_fields<'a>(
        &self,
        id: &str,
        staged: &'a StagedArticle,
    ) -> Option<(&'a str, &'a str, Option<&'a str>)> {
        let title = non_empty(staged.title.as_deref());
        let summary = non_empty(staged.summary.as_deref());
        let content = non_empty(staged.content.as_deref());

        let content_ok = !self.variant.needs_content() || content.is_some();
        match (title, summary, content_ok) {
            (Some(title), Some(summary), true) => Some((title, summary, content)),
            _ => {
                warn!(
                    id,
                    missing_title = title.is_none(),
                    missing_summary = summary.is_none(),
                    missing_content = !content_ok,
                    "staged article missing required fields, skipping"
                );
                None
            }
        }
    }

    fn assemble_curated(
        &self,
        staged: &StagedArticle,
        title: &str,
        summary: &str,
        content: Option<&str>,
        reply: &str,
    ) -> PublishedArticle {
        let captures = extract_labels(reply, self.variant.labels());

        // Per-field fallback: an absent (or empty) label means the
        // original value, budgeted identically.
        let curated_title = captures.get("TITLE").map(String::as_str).unwrap_or(title);
        let curated_description = captures
            .get("DESCRIPTION")
            .map(String::as_str)
            .unwrap_or(summary);
        let curated_summary = captures
            .get("SUMMARY")
            .map(String::as_str)
            .unwrap_or_else(|| content.unwrap_or(summary));

        let now = Utc::now();
        PublishedArticle {
            title: fit_to_budget(curated_title, TITLE_BUDGET).into_owned(),
            description: fit_to_budget(curated_description, DESCRIPTION_BUDGET).into_owned(),
            summary: fit_to_budget(curated_summary, SUMMARY_BUDGET).into_owned(),
            sport: staged.sport.clone(),
            status: ArticleStatus::Published,
            published_at: now,
            curated_at: Some(now),
            original_title: Some(title.to_string()),
            original_summary: Some(summary.to_string()),
            original_content: content.map(str::to_string),
            curation_failed: false,
            error_message: None,
            extra: staged.extra.clone(),
        }
    }

    fn assemble_fallback(
        &self,
        staged: &StagedArticle,
        title: &str,
        summary: &str,
        content: Option<&str>,
        error_message: &str,
    ) -> PublishedArticle {
        PublishedArticle {
            title: fit_to_budget(title, TITLE_BUDGET).into_owned(),
            description: fit_to_budget(summary, DESCRIPTION_BUDGET).into_owned(),
            summary: fit_to_budget(content.unwrap_or(summary), SUMMARY_BUDGET).into_owned(),
            sport: staged.sport.clone(),
            status: ArticleStatus::Published,
            published_at: Utc::now(),
            curated_at: None,
            original_title: Some(title.to_string()),
            original_summary: Some(summary.to_string()),
            original_content: content.map(str::to_string),
            curation_failed: true,
            error_message: Some(error_message.to_string()),
            extra: staged.extra.clone(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
