pub mod config;
pub mod error;
pub mod sport;
pub mod text;
pub mod types;

pub use config::AppConfig;
pub use error::{ErrorCode, PipelineError};
pub use sport::{display_name, sport_topic};
pub use text::fit_to_budget;
pub use types::*;
