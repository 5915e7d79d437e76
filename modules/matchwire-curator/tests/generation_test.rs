//! Content-generation pipeline scenarios: auth gate, fan-out, atomicity.

use std::sync::Arc;

use matchwire_common::error::{ErrorCode, PipelineError};
use matchwire_common::types::{AdminUser, ContentType, GeneratedBody, GenerationStatus};
use matchwire_curator::generate::{ContentGenerationPipeline, GenerationInput};
use matchwire_curator::store::MemoryStore;
use matchwire_curator::testing::{active_admin, MockCompletion};

fn input(content_type: ContentType) -> GenerationInput {
    GenerationInput {
        request_id: "req-1".to_string(),
        content_type,
        sport: "cricket".to_string(),
        quantity: 2,
        difficulty: "easy".to_string(),
        age_group: Some("8-12".to_string()),
        source_type: None,
    }
}

#[tokio::test]
async fn unknown_caller_is_unauthenticated_and_writes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let completion = Arc::new(MockCompletion::new().reply("[]"));
    let pipeline = ContentGenerationPipeline::new(store.clone(), completion.clone());

    let err = pipeline
        .run("ghost", input(ContentType::BulkTrivia))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Unauthenticated);
    assert_eq!(completion.call_count(), 0);
    assert_eq!(store.content_feed_len(), 0);
    assert!(store.generation_request("req-1").is_none());
}

#[tokio::test]
async fn non_admin_caller_is_permission_denied() {
    let store = Arc::new(
        MemoryStore::new().with_admin(AdminUser {
            id: "u1".to_string(),
            role: "editor".to_string(),
            active: true,
            name: None,
        }),
    );
    let completion = Arc::new(MockCompletion::new());
    let pipeline = ContentGenerationPipeline::new(store.clone(), completion.clone());

    let err = pipeline
        .run("u1", input(ContentType::BulkTrivia))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::PermissionDenied);
    assert_eq!(completion.call_count(), 0);
}

#[tokio::test]
async fn inactive_admin_is_rejected() {
    let store = Arc::new(
        MemoryStore::new().with_admin(AdminUser {
            id: "u2".to_string(),
            role: "admin".to_string(),
            active: false,
            name: None,
        }),
    );
    let pipeline = ContentGenerationPipeline::new(store, Arc::new(MockCompletion::new()));

    let err = pipeline
        .run("u2", input(ContentType::SportFacts))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Unauthorized {
            known_caller: true,
            ..
        }
    ));
}

#[tokio::test]
async fn trivia_array_fans_out_and_completes_tracking() {
    let store = Arc::new(MemoryStore::new().with_admin(active_admin("admin-1")));
    let reply = r#"[
        {"question": "Q1", "options": ["a","b","c","d"], "correct_answer": "a", "explanation": "E1"},
        {"question": "Q2", "options": ["a","b","c","d"], "correct_answer": "b", "explanation": "E2"}
    ]"#;
    let completion = Arc::new(MockCompletion::new().reply(reply));
    let pipeline = ContentGenerationPipeline::new(store.clone(), completion);

    let outcome = pipeline
        .run("admin-1", input(ContentType::BulkTrivia))
        .await
        .unwrap();

    assert_eq!(outcome.items.len(), 2);
    assert_eq!(store.content_feed_len(), 2);

    let (first_id, first) = &outcome.items[0];
    assert!(matches!(first.body, GeneratedBody::Trivia { .. }));
    assert_eq!(first.sport, "cricket");
    assert_eq!(first.times_shown, 0);
    assert_eq!(first.likes, 0);
    assert!(store.content_item(first_id).is_some());

    let tracking = store.generation_request("req-1").unwrap();
    assert_eq!(tracking.status, GenerationStatus::Completed);
    assert_eq!(tracking.generated_ids, outcome.ids());
}

#[tokio::test]
async fn single_object_reply_wraps_into_one_item() {
    let store = Arc::new(MemoryStore::new().with_admin(active_admin("admin-1")));
    let reply = r#"{"title": "Hydration", "benefits": ["focus"], "content": "Pack water.", "age_group": "8-12"}"#;
    let completion = Arc::new(MockCompletion::new().reply(reply));
    let pipeline = ContentGenerationPipeline::new(store.clone(), completion);

    let outcome = pipeline
        .run("admin-1", input(ContentType::SingleParentTip))
        .await
        .unwrap();
    assert_eq!(outcome.items.len(), 1);
    assert!(matches!(
        outcome.items[0].1.body,
        GeneratedBody::ParentTip { .. }
    ));
}

#[tokio::test]
async fn prose_wrapped_json_is_recovered() {
    let store = Arc::new(MemoryStore::new().with_admin(active_admin("admin-1")));
    let reply = "Here you go!\n```json\n[{\"fact\": \"Cricket balls are cork-cored.\", \"details\": \"Layered with string.\", \"category\": \"equipment\"}]\n```";
    let completion = Arc::new(MockCompletion::new().reply(reply));
    let pipeline = ContentGenerationPipeline::new(store.clone(), completion);

    let outcome = pipeline
        .run("admin-1", input(ContentType::SportFacts))
        .await
        .unwrap();
    assert_eq!(outcome.items.len(), 1);
}

#[tokio::test]
async fn unparseable_reply_fails_tracking_and_writes_no_content() {
    let store = Arc::new(MemoryStore::new().with_admin(active_admin("admin-1")));
    let completion = Arc::new(MockCompletion::new().reply("I'd rather not."));
    let pipeline = ContentGenerationPipeline::new(store.clone(), completion);

    let err = pipeline
        .run("admin-1", input(ContentType::BulkTrivia))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Parse(_)));
    assert_eq!(err.code(), ErrorCode::Internal);

    // No partial batch: nothing landed in the feed.
    assert_eq!(store.content_feed_len(), 0);

    let tracking = store.generation_request("req-1").unwrap();
    assert_eq!(tracking.status, GenerationStatus::Failed);
    assert!(tracking.error.is_some());
    assert!(tracking.generated_ids.is_empty());
}

#[tokio::test]
async fn wrong_item_shape_is_terminal_with_no_writes() {
    let store = Arc::new(MemoryStore::new().with_admin(active_admin("admin-1")));
    // Valid JSON, wrong shape for trivia: the whole batch is rejected.
    let reply = r#"[
        {"question": "Q1", "options": ["a","b"], "correct_answer": "a"},
        {"fact": "Not a trivia item"}
    ]"#;
    let completion = Arc::new(MockCompletion::new().reply(reply));
    let pipeline = ContentGenerationPipeline::new(store.clone(), completion);

    let err = pipeline
        .run("admin-1", input(ContentType::BulkTrivia))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Parse(_)));
    assert_eq!(store.content_feed_len(), 0);
}

#[tokio::test]
async fn completion_failure_is_terminal_not_recovered() {
    let store = Arc::new(MemoryStore::new().with_admin(active_admin("admin-1")));
    let completion = Arc::new(MockCompletion::new().fail("rate limited"));
    let pipeline = ContentGenerationPipeline::new(store.clone(), completion);

    let err = pipeline
        .run("admin-1", input(ContentType::MixedContent))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Completion(_)));

    let tracking = store.generation_request("req-1").unwrap();
    assert_eq!(tracking.status, GenerationStatus::Failed);
}

#[tokio::test]
async fn zero_quantity_is_rejected_before_any_call() {
    let store = Arc::new(MemoryStore::new().with_admin(active_admin("admin-1")));
    let completion = Arc::new(MockCompletion::new());
    let pipeline = ContentGenerationPipeline::new(store.clone(), completion.clone());

    let mut bad = input(ContentType::BulkTrivia);
    bad.quantity = 0;
    let err = pipeline.run("admin-1", bad).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
    assert_eq!(completion.call_count(), 0);
}

#[tokio::test]
async fn reference_facts_enrich_the_prompt() {
    let store = Arc::new(
        MemoryStore::new()
            .with_admin(active_admin("admin-1"))
            .with_reference_facts(
                "cricket",
                vec!["A cricket over has six balls.".to_string()],
            ),
    );
    let reply = r#"[{"fact": "F", "details": "D", "category": "c"}]"#;
    let completion = Arc::new(MockCompletion::new().reply(reply));
    let pipeline = ContentGenerationPipeline::new(store, completion.clone());

    pipeline
        .run("admin-1", input(ContentType::SportFacts))
        .await
        .unwrap();

    let calls = completion.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].json_output);
    let user_prompt = &calls[0].messages.last().unwrap().content;
    assert!(user_prompt.contains("A cricket over has six balls."));
}
