use crate::{
    error::{ImageGenError, Result},
    models::{DownloadRequest, GenerationRequest, GenerationResponse},
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// What a front end needs from the two endpoints.
#[async_trait]
pub trait StudioApi: Send + Sync {
    /// Never fails: every problem comes back as `success: false`.
    async fn generate_image(&self, request: &GenerationRequest) -> GenerationResponse;
    async fn download_image(&self, image_url: &str, filename: &str) -> Result<Vec<u8>>;
}

#[derive(Clone)]
pub struct StudioClient {
    client: Client,
    base_url: String,
}

impl StudioClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn try_generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            return Err(ImageGenError::Internal(error_message(status.as_u16(), &body)));
        }

        response
            .json::<GenerationResponse>()
            .await
            .map_err(|e| ImageGenError::Response(e.to_string()))
    }
}

/// The server's `error` field when present, otherwise a generic status line.
pub fn error_message(status: u16, body: &Value) -> String {
    body.get("error")
        .and_then(Value::as_str)
        .filter(|msg| !msg.is_empty())
        .map(String::from)
        .unwrap_or_else(|| format!("HTTP error! status: {}", status))
}

#[async_trait]
impl StudioApi for StudioClient {
    async fn generate_image(&self, request: &GenerationRequest) -> GenerationResponse {
        match self.try_generate(request).await {
            Ok(response) => response,
            Err(e) => {
                log::error!("Image generation error: {}", e);
                GenerationResponse::failed(e.to_string())
            }
        }
    }

    async fn download_image(&self, image_url: &str, filename: &str) -> Result<Vec<u8>> {
        let request = DownloadRequest {
            image_url: Some(image_url.to_string()),
            filename: Some(filename.to_string()),
        };

        let response = self
            .client
            .post(format!("{}/api/download", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            log::error!("Download error: status {}", response.status().as_u16());
            return Err(ImageGenError::Response("Download failed".into()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_prefers_body() {
        assert_eq!(
            error_message(400, &json!({ "success": false, "error": "Prompt is required" })),
            "Prompt is required"
        );
    }

    #[test]
    fn test_error_message_fallback() {
        assert_eq!(error_message(502, &Value::Null), "HTTP error! status: 502");
        assert_eq!(
            error_message(500, &json!({ "error": "" })),
            "HTTP error! status: 500"
        );
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = StudioClient::new("http://127.0.0.1:3000/");
        assert_eq!(client.base_url, "http://127.0.0.1:3000");
    }

    #[tokio::test]
    async fn test_unreachable_server_yields_failed_envelope() {
        // Port 9 (discard) is not expected to run an HTTP server.
        let client = StudioClient::new("http://127.0.0.1:9");
        let response = client
            .generate_image(&GenerationRequest::new("a cat"))
            .await;
        assert!(!response.success);
        assert!(response.error.is_some());
        assert!(response.image_url.is_none());
    }
}
