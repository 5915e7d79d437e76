mod client;
pub(crate) mod types;

use anyhow::{anyhow, Result};

use crate::message::Message;
use client::OpenAiClient;
use types::{ChatRequest, WireMessage};

/// Chat-completion client bound to one model.
///
/// Cheap to clone; constructed once at startup and passed in explicitly.
#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    model: String,
    base_url: Option<String>,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY environment variable not set"))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> OpenAiClient {
        let client = OpenAiClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    /// One bounded chat completion. Returns the first choice's text.
    pub async fn chat_completion(
        &self,
        messages: &[Message],
        temperature: f32,
        max_tokens: u32,
        json_output: bool,
    ) -> Result<String> {
        let mut request = ChatRequest::new(&self.model)
            .messages(messages.iter().map(WireMessage::from))
            .temperature(temperature)
            .max_tokens(max_tokens);

        if json_output {
            request = request.json_output();
        }

        let response = self.client().chat(&request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("No response from completion API"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_new() {
        let ai = OpenAi::new("sk-test", "gpt-4o-mini");
        assert_eq!(ai.model(), "gpt-4o-mini");
        assert!(ai.base_url.is_none());
    }

    #[test]
    fn test_openai_with_base_url() {
        let ai = OpenAi::new("sk-test", "gpt-4o-mini").with_base_url("https://custom.api.com");
        assert_eq!(ai.base_url, Some("https://custom.api.com".to_string()));
    }
}
