use thiserror::Error;

pub type Result<T> = std::result::Result<T, SanityError>;

#[derive(Debug, Error)]
pub enum SanityError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SanityError {
    fn from(err: reqwest::Error) -> Self {
        SanityError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SanityError {
    fn from(err: serde_json::Error) -> Self {
        SanityError::Parse(err.to_string())
    }
}
