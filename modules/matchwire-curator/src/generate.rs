//! Admin-gated batch content generation.
//!
//! Unlike curation there is no safe default content to substitute, so
//! every failure past the auth gate is terminal: the tracking record is
//! marked failed and the error is re-signalled to the caller. The batch
//! itself is committed through one atomic group write; readers see all
//! of it or none of it.

use std::sync::Arc;

use ai_client::Message;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use matchwire_common::error::PipelineError;
use matchwire_common::types::{
    ContentType, GeneratedBody, GeneratedContent, GenerationRequest, GenerationStatus,
};

use crate::parse::extract_json;
use crate::prompt::{generation_prompt, GENERATION_SYSTEM_PROMPT};
use crate::traits::{CompletionClient, CompletionRequest, DocumentStore};

const GENERATION_TEMPERATURE: f32 = 0.7;
const GENERATION_MAX_TOKENS: u32 = 2_000;
/// Upper bound on one batch; requests above it are rejected outright.
pub const MAX_BATCH_QUANTITY: u32 = 25;

/// The callable's request payload, already decoded.
#[derive(Debug, Clone)]
pub struct GenerationInput {
    pub request_id: String,
    pub content_type: ContentType,
    pub sport: String,
    pub quantity: u32,
    pub difficulty: String,
    pub age_group: Option<String>,
    pub source_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Generated items paired with their store-assigned ids.
    pub items: Vec<(String, GeneratedContent)>,
}

impl GenerationOutcome {
    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|(id, _)| id.clone()).collect()
    }
}

pub struct ContentGenerationPipeline {
    store: Arc<dyn DocumentStore>,
    completion: Arc<dyn CompletionClient>,
}

impl ContentGenerationPipeline {
    pub fn new(store: Arc<dyn DocumentStore>, completion: Arc<dyn CompletionClient>) -> Self {
        Self { store, completion }
    }

    pub async fn run(
        &self,
        caller_id: &str,
        input: GenerationInput,
    ) -> Result<GenerationOutcome, PipelineError> {
        // Fail-closed: no side effect of any kind before the auth gate.
        self.authorize(caller_id).await?;

        if input.quantity == 0 || input.quantity > MAX_BATCH_QUANTITY {
            return Err(PipelineError::InvalidRequest(format!(
                "quantity must be between 1 and {MAX_BATCH_QUANTITY}"
            )));
        }

        let now = Utc::now();
        let mut tracking = GenerationRequest {
            request_id: input.request_id.clone(),
            requested_by: caller_id.to_string(),
            content_type: input.content_type,
            sport: input.sport.clone(),
            quantity: input.quantity,
            difficulty: input.difficulty.clone(),
            age_group: input.age_group.clone(),
            source_type: input.source_type.clone(),
            status: GenerationStatus::Processing,
            error: None,
            generated_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.store
            .put_generation_request(&tracking)
            .await
            .map_err(|e| PipelineError::Store(e.to_string()))?;

        match self.generate(caller_id, &input).await {
            Ok(outcome) => {
                tracking.status = GenerationStatus::Completed;
                tracking.generated_ids = outcome.ids();
                tracking.updated_at = Utc::now();
                self.store
                    .put_generation_request(&tracking)
                    .await
                    .map_err(|e| PipelineError::Store(e.to_string()))?;
                info!(
                    request_id = input.request_id,
                    count = outcome.items.len(),
                    "generation batch committed"
                );
                Ok(outcome)
            }
            Err(err) => {
                tracking.status = GenerationStatus::Failed;
                tracking.error = Some(err.to_string());
                tracking.updated_at = Utc::now();
                // Best effort; the original error is what the caller sees.
                if let Err(store_err) = self.store.put_generation_request(&tracking).await {
                    warn!(
                        request_id = input.request_id,
                        error = %store_err,
                        "failed to mark generation request as failed"
                    );
                }
                Err(err)
            }
        }
    }

    async fn authorize(&self, caller_id: &str) -> Result<(), PipelineError> {
        let user = self
            .store
            .admin_user(caller_id)
            .await
            .map_err(|e| PipelineError::Store(e.to_string()))?;

        match user {
            None => Err(PipelineError::Unauthorized {
                known_caller: false,
                reason: format!("no such caller: {caller_id}"),
            }),
            Some(user) if !user.is_admin() => Err(PipelineError::Unauthorized {
                known_caller: true,
                reason: format!("caller {caller_id} is not an active admin"),
            }),
            Some(_) => Ok(()),
        }
    }

    async fn generate(
        &self,
        caller_id: &str,
        input: &GenerationInput,
    ) -> Result<GenerationOutcome, PipelineError> {
        let facts = self
            .store
            .reference_facts(&input.sport)
            .await
            .map_err(|e| PipelineError::Store(e.to_string()))?;

        let prompt = generation_prompt(
            input.content_type,
            &input.sport,
            input.quantity,
            &input.difficulty,
            input.age_group.as_deref(),
            &facts,
        );

        let request = CompletionRequest {
            messages: vec![
                Message::system(GENERATION_SYSTEM_PROMPT),
                Message::user(prompt),
            ],
            temperature: GENERATION_TEMPERATURE,
            max_tokens: GENERATION_MAX_TOKENS,
            json_output: true,
        };

        let reply = self
            .completion
            .complete(&request)
            .await
            .map_err(|e| PipelineError::Completion(e.to_string()))?;

        let value = extract_json(&reply).map_err(|e| PipelineError::Parse(e.to_string()))?;

        // A returned array fans out; a single object wraps.
        let raw_items = match value {
            serde_json::Value::Array(items) => items,
            object @ serde_json::Value::Object(_) => vec![object],
            other => {
                return Err(PipelineError::Parse(format!(
                    "expected JSON array or object, got {other}"
                )))
            }
        };

        if raw_items.is_empty() {
            return Err(PipelineError::Parse("model returned an empty batch".into()));
        }

        let source = input
            .source_type
            .clone()
            .unwrap_or_else(|| "ai".to_string());
        let created_at = Utc::now();

        let items = raw_items
            .into_iter()
            .map(|raw| {
                let body = decode_body(input.content_type, raw)?;
                Ok(GeneratedContent {
                    sport: input.sport.clone(),
                    source: source.clone(),
                    times_shown: 0,
                    likes: 0,
                    created_at,
                    body,
                })
            })
            .collect::<Result<Vec<_>, PipelineError>>()?;

        let ids = self
            .store
            .commit_generated(&items)
            .await
            .map_err(|e| PipelineError::Store(e.to_string()))?;

        info!(
            caller_id,
            content_type = %input.content_type,
            sport = input.sport,
            count = items.len(),
            "generated content decoded"
        );

        Ok(GenerationOutcome {
            items: ids.into_iter().zip(items).collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// Per-type decoding
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct TriviaItem {
    question: String,
    options: Vec<String>,
    correct_answer: String,
    #[serde(default)]
    explanation: Option<String>,
}

#[derive(Deserialize)]
struct ParentTipItem {
    title: String,
    #[serde(default)]
    benefits: Vec<String>,
    content: String,
    #[serde(default)]
    age_group: Option<String>,
}

#[derive(Deserialize)]
struct FactItem {
    fact: String,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

/// Decode one raw item into the variant the requested type demands.
/// Absent sub-fields beyond the documented optionals fail explicitly
/// rather than coercing to defaults.
fn decode_body(
    content_type: ContentType,
    raw: serde_json::Value,
) -> Result<GeneratedBody, PipelineError> {
    let result = match content_type {
        ContentType::BulkTrivia => serde_json::from_value::<TriviaItem>(raw).map(|item| {
            GeneratedBody::Trivia {
                question: item.question,
                options: item.options,
                correct_answer: item.correct_answer,
                explanation: item.explanation,
            }
        }),
        ContentType::SingleParentTip => serde_json::from_value::<ParentTipItem>(raw).map(|item| {
            GeneratedBody::ParentTip {
                title: item.title,
                benefits: item.benefits,
                content: item.content,
                age_group: item.age_group,
            }
        }),
        ContentType::SportFacts => {
            serde_json::from_value::<FactItem>(raw).map(|item| GeneratedBody::DidYouKnow {
                fact: item.fact,
                details: item.details,
                category: item.category,
            })
        }
        // Mixed items carry their own `type` tag.
        ContentType::MixedContent | ContentType::General => {
            serde_json::from_value::<GeneratedBody>(raw)
        }
    };

    result.map_err(|e| PipelineError::Parse(format!("generated item has wrong shape: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_trivia_item() {
        let raw = json!({
            "question": "Who won the 2018 World Cup?",
            "options": ["France", "Croatia", "Brazil", "Germany"],
            "correct_answer": "France",
            "explanation": "France beat Croatia 4-2 in Moscow."
        });
        let body = decode_body(ContentType::BulkTrivia, raw).unwrap();
        assert!(
            matches!(body, GeneratedBody::Trivia { ref correct_answer, .. } if correct_answer == "France")
        );
    }

    #[test]
    fn test_decode_rejects_cross_type_shape() {
        let raw = json!({"fact": "Golf balls have dimples."});
        let err = decode_body(ContentType::BulkTrivia, raw).unwrap_err();
        assert!(matches!(err, PipelineError::Parse(_)));
    }

    #[test]
    fn test_decode_mixed_requires_type_tag() {
        let tagged = json!({"type": "did_you_know", "fact": "F"});
        assert!(decode_body(ContentType::MixedContent, tagged).is_ok());

        let untagged = json!({"fact": "F"});
        assert!(decode_body(ContentType::MixedContent, untagged).is_err());
    }
}
