use thiserror::Error;

#[derive(Error, Debug)]
pub enum DoomwatchError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Discovery pipeline failed: {0}")]
    Pipeline(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Classification error: {0}")]
    Classification(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
