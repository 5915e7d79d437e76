use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod generate;
pub mod health;
pub mod submit;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health))
        .route("/v1/staging", post(submit::submit_staged))
        .route("/v1/generate", post(generate::generate_content))
}
