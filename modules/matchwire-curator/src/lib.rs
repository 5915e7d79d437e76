pub mod curate;
pub mod generate;
pub mod notify;
pub mod parse;
pub mod prompt;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;

pub use curate::CurationPipeline;
pub use generate::{ContentGenerationPipeline, GenerationInput, GenerationOutcome};
pub use notify::{NotificationComposer, TopicPolicy};
pub use prompt::PromptVariant;
pub use store::MemoryStore;
pub use traits::{CompletionClient, CompletionRequest, DocumentStore, NoopPush, PushSender};
