use thiserror::Error;

pub const NO_IMAGE_URL_MESSAGE: &str =
    "Failed to generate image. The AI service did not return a valid image URL.";

#[derive(Debug, Error)]
pub enum ImageGenError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("AI service error: {}. Please try again.", status_label(.status))]
    Upstream { status: Option<u16>, body: String },
    #[error("{}", NO_IMAGE_URL_MESSAGE)]
    NoImageUrl,
    #[error("Failed to fetch image")]
    FetchFailed(u16),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Response error: {0}")]
    Response(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("{0}")]
    Internal(String),
}

fn status_label(status: &Option<u16>) -> String {
    status.map_or_else(|| "unavailable".to_string(), |s| s.to_string())
}

impl ImageGenError {
    /// True for failures caused by the caller's request rather than by us or the upstream.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ImageGenError::InvalidInput(_) | ImageGenError::FetchFailed(_)
        )
    }
}

impl From<reqwest::Error> for ImageGenError {
    fn from(e: reqwest::Error) -> Self {
        ImageGenError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for ImageGenError {
    fn from(e: serde_json::Error) -> Self {
        ImageGenError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for ImageGenError {
    fn from(e: std::io::Error) -> Self {
        ImageGenError::Storage(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ImageGenError>;
