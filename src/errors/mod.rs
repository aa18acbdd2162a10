use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeraldError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Parsing errors
    #[error("Feed parsing failed: {0}")]
    FeedParse(String),

    // State errors
    #[error("State file error: {0}")]
    State(String),

    // Notification errors
    #[error("Notification failed: {0}")]
    Publish(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<webhook::WebhookError> for HeraldError {
    fn from(err: webhook::WebhookError) -> Self {
        HeraldError::Publish(err.to_string())
    }
}

pub type HeraldResult<T> = Result<T, HeraldError>;
