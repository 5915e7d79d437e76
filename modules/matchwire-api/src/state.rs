use std::sync::Arc;

use matchwire_curator::{
    ContentGenerationPipeline, CurationPipeline, MemoryStore, NotificationComposer,
};

/// Everything the handlers need, wired once in `main`.
pub struct AppState {
    /// Concrete handle kept for seeding; the pipelines hold the same
    /// store behind `Arc<dyn DocumentStore>`.
    pub store: Arc<MemoryStore>,
    pub curation: CurationPipeline,
    pub composer: NotificationComposer,
    pub generation: ContentGenerationPipeline,
}
