use thiserror::Error;

pub type Result<T> = std::result::Result<T, FcmError>;

#[derive(Debug, Error)]
pub enum FcmError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FcmError {
    fn from(err: reqwest::Error) -> Self {
        FcmError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for FcmError {
    fn from(err: serde_json::Error) -> Self {
        FcmError::Parse(err.to_string())
    }
}
