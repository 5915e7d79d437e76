//! Staged-submission intake: the "record created" trigger chain.
//!
//! One request drives the full sequence: persist the staged record, run
//! curation, then compose notifications for the published result. This
//! is the same chain the managed trigger framework runs stage by stage.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use matchwire_common::types::StagedArticle;
use matchwire_curator::DocumentStore;

use crate::state::AppState;

#[derive(Deserialize)]
pub struct SubmitRequest {
    /// Caller-supplied key; generated when absent.
    pub id: Option<String>,
    pub article: StagedArticle,
}

pub async fn submit_staged(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubmitRequest>,
) -> impl IntoResponse {
    let id = body.id.unwrap_or_else(|| Uuid::new_v4().to_string());

    if let Err(err) = state.store.put_staged(&id, &body.article).await {
        error!(id, error = %err, "failed to persist staged article");
        return internal_error(&id);
    }

    let published = match state.curation.run(&id, &body.article).await {
        Ok(published) => published,
        Err(err) => {
            error!(id, error = %err, "curation invocation failed");
            return internal_error(&id);
        }
    };

    let Some(article) = published else {
        // Invalid input is a logged skip, not a client error: the staged
        // record stays where it is and nothing else happens.
        return (
            StatusCode::OK,
            Json(serde_json::json!({ "id": id, "status": "skipped" })),
        )
            .into_response();
    };

    let notifications = match state.composer.notify_article(&id, &article).await {
        Ok(records) => records.len(),
        Err(err) => {
            error!(id, error = %err, "notification composition failed");
            return internal_error(&id);
        }
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "id": id,
            "status": "published",
            "curation_failed": article.curation_failed,
            "notifications": notifications,
        })),
    )
        .into_response()
}

fn internal_error(id: &str) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "id": id, "error": "internal" })),
    )
        .into_response()
}
