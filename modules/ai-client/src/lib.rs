pub mod message;
pub mod openai;

pub use message::{Message, MessageRole};
pub use openai::OpenAi;
