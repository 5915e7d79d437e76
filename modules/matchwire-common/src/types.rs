use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// --- Staged input ---

/// A raw article submission, as written by the (external) submission
/// process. Field presence is validated by the pipeline, not by serde:
/// a record missing a required field must be skipped, not rejected at
/// decode time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StagedArticle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Short text shown on feed cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Longer text shown on the detail page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    /// Staging-only; stripped before publication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    /// Passthrough fields carried into the published record as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

// --- Published output ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    Published,
}

/// The publishable article shape the mobile client reads.
///
/// Every client-required field (title plus at least one descriptive
/// field) is always present and within budget, regardless of which code
/// path produced the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedArticle {
    pub title: String,
    /// Curated from the staged `summary`; card display, <= 120 chars.
    pub description: String,
    /// Curated from the staged `content`; detail page, <= 300 chars.
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    pub status: ArticleStatus,
    pub published_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curated_at: Option<DateTime<Utc>>,
    // Original values, shadowed for auditability (success path only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_content: Option<String>,
    /// Set when the model call or the parse failed and the original
    /// fields were published instead. Operator-facing only.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub curation_failed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

// --- Notification log ---

/// One persisted record per delivery attempt, success or failure.
/// This is a log for audit and debugging, not a queue; nothing retries
/// from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub topic: String,
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
    pub sent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

// --- Generated content ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    BulkTrivia,
    SingleParentTip,
    SportFacts,
    MixedContent,
    #[default]
    General,
}

// Unknown tags fall back to the generic default instead of failing the
// whole request decode.
impl<'de> serde::Deserialize<'de> for ContentType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(match tag.as_str() {
            "bulk_trivia" => ContentType::BulkTrivia,
            "single_parent_tip" => ContentType::SingleParentTip,
            "sport_facts" => ContentType::SportFacts,
            "mixed_content" => ContentType::MixedContent,
            _ => ContentType::General,
        })
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::BulkTrivia => write!(f, "bulk_trivia"),
            ContentType::SingleParentTip => write!(f, "single_parent_tip"),
            ContentType::SportFacts => write!(f, "sport_facts"),
            ContentType::MixedContent => write!(f, "mixed_content"),
            ContentType::General => write!(f, "general"),
        }
    }
}

/// Content shape, fully determined by the `type` tag. No cross-type
/// fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratedBody {
    Trivia {
        question: String,
        options: Vec<String>,
        correct_answer: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
    ParentTip {
        title: String,
        #[serde(default)]
        benefits: Vec<String>,
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        age_group: Option<String>,
    },
    DidYouKnow {
        fact: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category: Option<String>,
    },
}

impl GeneratedBody {
    /// Stable tag string, used for the per-content-type delivery topic.
    pub fn type_tag(&self) -> &'static str {
        match self {
            GeneratedBody::Trivia { .. } => "trivia",
            GeneratedBody::ParentTip { .. } => "parent_tip",
            GeneratedBody::DidYouKnow { .. } => "did_you_know",
        }
    }

    /// Headline-ish text for notification composition.
    pub fn headline(&self) -> &str {
        match self {
            GeneratedBody::Trivia { question, .. } => question,
            GeneratedBody::ParentTip { title, .. } => title,
            GeneratedBody::DidYouKnow { fact, .. } => fact,
        }
    }
}

/// A single generated content-feed item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub sport: String,
    /// Generation source tag, e.g. `"ai"` or a reference-facts source.
    pub source: String,
    pub times_shown: u32,
    pub likes: u32,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub body: GeneratedBody,
}

// --- Generation request tracking ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// Tracking record for one admin generation request. Moves
/// `pending → processing → completed | failed`; there is no
/// partial-success state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub request_id: String,
    pub requested_by: String,
    pub content_type: ContentType,
    pub sport: String,
    pub quantity: u32,
    pub difficulty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    pub status: GenerationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generated_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Admin registry ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub role: String,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AdminUser {
    pub fn is_admin(&self) -> bool {
        self.active && self.role == "admin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staged_article_tolerates_missing_fields() {
        let staged: StagedArticle = serde_json::from_str(r#"{"title": "Only a title"}"#).unwrap();
        assert_eq!(staged.title.as_deref(), Some("Only a title"));
        assert!(staged.summary.is_none());
        assert!(staged.content.is_none());
    }

    #[test]
    fn test_staged_article_keeps_passthrough_fields() {
        let staged: StagedArticle =
            serde_json::from_str(r#"{"title": "T", "author": "jo", "image_url": "x.webp"}"#)
                .unwrap();
        assert_eq!(staged.extra["author"], "jo");
        assert_eq!(staged.extra["image_url"], "x.webp");
    }

    #[test]
    fn test_generated_body_tag_round_trip() {
        let body = GeneratedBody::DidYouKnow {
            fact: "Golf balls have dimples.".to_string(),
            details: None,
            category: Some("golf".to_string()),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["type"], "did_you_know");
        let back: GeneratedBody = serde_json::from_value(json).unwrap();
        assert_eq!(back, body);
    }

    #[test]
    fn test_content_type_unknown_string_is_general() {
        let ct: ContentType = serde_json::from_value(serde_json::json!("whatever")).unwrap();
        assert_eq!(ct, ContentType::General);
    }

    #[test]
    fn test_curation_failed_omitted_when_false() {
        let article = PublishedArticle {
            title: "T".to_string(),
            description: "D".to_string(),
            summary: "S".to_string(),
            sport: None,
            status: ArticleStatus::Published,
            published_at: Utc::now(),
            curated_at: None,
            original_title: None,
            original_summary: None,
            original_content: None,
            curation_failed: false,
            error_message: None,
            extra: BTreeMap::new(),
        };
        let json = serde_json::to_value(&article).unwrap();
        assert!(json.get("curation_failed").is_none());
        assert_eq!(json["status"], "published");
    }
}
