use std::sync::Arc;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ai_client::OpenAi;
use fcm_client::FcmClient;
use matchwire_common::types::AdminUser;
use matchwire_common::AppConfig;
use matchwire_curator::{
    ContentGenerationPipeline, CurationPipeline, MemoryStore, NoopPush, NotificationComposer,
    PushSender,
};

mod rest;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("matchwire=info".parse()?))
        .init();

    let config = AppConfig::from_env()?;

    let ai = Arc::new(OpenAi::new(&config.openai_api_key, &config.openai_model));

    let push: Arc<dyn PushSender> = match (&config.fcm_project_id, &config.fcm_token) {
        (Some(project_id), Some(token)) => Arc::new(FcmClient::new(project_id, token)),
        _ => {
            warn!("FCM credentials not set, notifications are logged but not delivered");
            Arc::new(NoopPush)
        }
    };

    // The document database is an external collaborator; local runs are
    // backed by the in-memory store, seeded with the configured admins.
    let mut store = MemoryStore::new();
    for admin_id in &config.admin_ids {
        store = store.with_admin(AdminUser {
            id: admin_id.clone(),
            role: "admin".to_string(),
            active: true,
            name: None,
        });
    }
    let store = Arc::new(store);

    let state = Arc::new(AppState {
        store: store.clone(),
        curation: CurationPipeline::new(store.clone(), ai.clone()),
        composer: NotificationComposer::new(store.clone(), push),
        generation: ContentGenerationPipeline::new(store.clone(), ai),
    });

    let app = rest::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.api_host, config.api_port);
    info!(addr, "matchwire API listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
