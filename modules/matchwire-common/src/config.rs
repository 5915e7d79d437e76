use anyhow::Result;

/// Application configuration loaded from environment variables.
/// Secrets and env-specific values only; prompt text and budgets are
/// compiled in.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // AI / LLM
    pub openai_api_key: String,
    pub openai_model: String,

    // Push messaging
    pub fcm_project_id: Option<String>,
    pub fcm_token: Option<String>,

    // API surface
    pub api_host: String,
    pub api_port: u16,

    // Admin registry seed for local runs
    pub admin_ids: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            openai_api_key: std::env::var("OPENAI_API_KEY")?,
            openai_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            fcm_project_id: std::env::var("FCM_PROJECT_ID").ok(),
            fcm_token: std::env::var("FCM_TOKEN").ok(),
            api_host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            admin_ids: std::env::var("ADMIN_IDS")
                .unwrap_or_default()
                .split(',')
                .filter(|s| !s.is_empty())
                .map(|s| s.trim().to_string())
                .collect(),
        };

        config.log_keys();
        Ok(config)
    }

    fn log_keys(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  OPENAI_API_KEY: {}", preview(&self.openai_api_key));
        tracing::info!("  OPENAI_MODEL: {}", self.openai_model);
        tracing::info!("  FCM_PROJECT_ID: {}", preview_opt(&self.fcm_project_id));
        tracing::info!("  FCM_TOKEN: {}", preview_opt(&self.fcm_token));
    }
}

/// Log-safe secret preview: first few characters plus the length.
/// Counts characters so a multibyte secret cannot split a scalar.
fn preview(val: &str) -> String {
    let head: String = val.chars().take(5).collect();
    format!("{}...({} chars)", head, val.chars().count())
}

fn preview_opt(val: &Option<String>) -> String {
    match val {
        Some(v) if !v.is_empty() => preview(v),
        _ => "<not set>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_shows_prefix_and_length() {
        assert_eq!(preview("sk-abcdef123"), "sk-ab...(12 chars)");
    }

    #[test]
    fn test_preview_handles_multibyte_secrets() {
        // 2-byte chars; a byte slice at 5 would split the third one.
        assert_eq!(preview("éééééé"), "ééééé...(6 chars)");
        assert_eq!(preview("éé"), "éé...(2 chars)");
    }
}
