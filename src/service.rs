use crate::{
    error::{ImageGenError, Result},
    models::{DownloadRequest, GenerationRequest, DEFAULT_DOWNLOAD_FILENAME},
    normalizer::extract_image_url,
    prompt::enhance_prompt,
    upstream::{CompletionApi, ImageFetcher, UpstreamClient},
};
use std::sync::Arc;

/// An image ready to be returned as an attachment.
#[derive(Debug, Clone)]
pub struct Download {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

/// Request handling shared by every front end. Holds no mutable state, so one
/// instance serves all requests.
#[derive(Clone)]
pub struct ImageService {
    completion: Arc<dyn CompletionApi>,
    fetcher: Arc<dyn ImageFetcher>,
}

impl ImageService {
    pub fn new(completion: Arc<dyn CompletionApi>, fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self {
            completion,
            fetcher,
        }
    }

    pub fn from_upstream(upstream: &UpstreamClient) -> Self {
        Self::new(upstream.completion_api(), upstream.image_fetcher())
    }

    /// Validates the request, makes one upstream call and returns the image URL.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let prompt = request
            .prompt
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ImageGenError::InvalidInput("Prompt is required".into()))?;

        let enhanced = enhance_prompt(
            prompt,
            request.style.as_deref(),
            request.dimensions.as_deref(),
        );

        let reply = self.completion.complete(&enhanced).await?;

        extract_image_url(&reply).ok_or_else(|| {
            log::error!(
                "No image URL found in AI response: {}",
                serde_json::to_string_pretty(&reply).unwrap_or_default()
            );
            ImageGenError::NoImageUrl
        })
    }

    pub async fn download(&self, request: &DownloadRequest) -> Result<Download> {
        let image_url = request
            .image_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ImageGenError::InvalidInput("Image URL is required".into()))?;

        let image = self.fetcher.fetch(image_url).await?;

        Ok(Download {
            bytes: image.bytes,
            content_type: image
                .content_type
                .unwrap_or_else(|| "image/jpeg".to_string()),
            filename: attachment_filename(request.filename.as_deref()),
        })
    }
}

/// Makes a caller-supplied name safe to quote inside `Content-Disposition`.
/// Control characters, quotes and backslashes are dropped; a name with
/// nothing left falls back to the default.
fn attachment_filename(requested: Option<&str>) -> String {
    let cleaned: String = requested
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();

    if cleaned.trim().is_empty() {
        DEFAULT_DOWNLOAD_FILENAME.to_string()
    } else {
        cleaned
    }
}
