//! The admin content-generation callable.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::warn;

use matchwire_common::error::ErrorCode;
use matchwire_common::types::ContentType;
use matchwire_curator::GenerationInput;

use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub admin_id: String,
    pub request_id: String,
    #[serde(default)]
    pub content_type: ContentType,
    pub sport_category: String,
    pub quantity: u32,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub age_group: Option<String>,
    #[serde(default)]
    pub source_type: Option<String>,
}

pub async fn generate_content(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateRequest>,
) -> impl IntoResponse {
    let input = GenerationInput {
        request_id: body.request_id,
        content_type: body.content_type,
        sport: body.sport_category,
        quantity: body.quantity,
        difficulty: body.difficulty.unwrap_or_else(|| "medium".to_string()),
        age_group: body.age_group,
        source_type: body.source_type,
    };

    let outcome = match state.generation.run(&body.admin_id, input).await {
        Ok(outcome) => outcome,
        Err(err) => {
            let code = err.code();
            let status = match code {
                ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
                ErrorCode::PermissionDenied => StatusCode::FORBIDDEN,
                ErrorCode::InvalidArgument => StatusCode::BAD_REQUEST,
                ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            };
            return (
                status,
                Json(serde_json::json!({
                    "success": false,
                    "code": code,
                    "message": err.to_string(),
                })),
            )
                .into_response();
        }
    };

    // Downstream trigger: each new content item composes a notification.
    // Delivery problems are the composer's to log, not the callable's to
    // surface.
    for (content_id, item) in &outcome.items {
        if let Err(err) = state.composer.notify_generated(content_id, item).await {
            warn!(content_id, error = %err, "generated-content notification failed");
        }
    }

    let ids = outcome.ids();
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "success": true,
            "count": ids.len(),
            "generatedIds": ids,
            "message": format!("generated {} content item(s)", ids.len()),
        })),
    )
        .into_response()
}
