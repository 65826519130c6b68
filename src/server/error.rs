use crate::{
    error::ImageGenError,
    models::{ErrorBody, GenerationResponse},
};
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

const INTERNAL_FALLBACK: &str = "Internal server error";

/// Generation failures render as the `{success: false, error}` envelope.
///
/// Upstream status bodies and other diagnostics only ever reach the log.
impl ResponseError for ImageGenError {
    fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_client_error() {
            log::warn!("Rejected generation request: {}", self);
        } else {
            log::error!("Image generation error: {}", self);
        }

        let message = self.to_string();
        let message = if message.is_empty() {
            INTERNAL_FALLBACK.to_string()
        } else {
            message
        };
        HttpResponse::build(status).json(GenerationResponse::failed(message))
    }
}

/// Download failures render as a bare `{error}` body with fixed wording.
#[derive(Debug)]
pub struct DownloadFailure(pub ImageGenError);

impl From<ImageGenError> for DownloadFailure {
    fn from(e: ImageGenError) -> Self {
        DownloadFailure(e)
    }
}

impl fmt::Display for DownloadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            ImageGenError::InvalidInput(msg) => write!(f, "{}", msg),
            ImageGenError::FetchFailed(_) => write!(f, "Failed to fetch image"),
            _ => write!(f, "Failed to download image"),
        }
    }
}

impl ResponseError for DownloadFailure {
    fn status_code(&self) -> StatusCode {
        self.0.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_client_error() {
            log::warn!("Rejected download request: {}", self.0);
        } else {
            log::error!("Download error: {}", self.0);
        }

        HttpResponse::build(status).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ImageGenError::InvalidInput("Prompt is required".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ImageGenError::NoImageUrl.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ImageGenError::Upstream {
                status: Some(401),
                body: String::new()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            DownloadFailure(ImageGenError::FetchFailed(404)).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_download_messages_hide_details() {
        assert_eq!(
            DownloadFailure(ImageGenError::FetchFailed(404)).to_string(),
            "Failed to fetch image"
        );
        assert_eq!(
            DownloadFailure(ImageGenError::Transport("dns failure for 10.0.0.1".into())).to_string(),
            "Failed to download image"
        );
    }
}
