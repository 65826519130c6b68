use crate::{
    config::UpstreamConfig,
    error::{ImageGenError, Result},
    logger,
    models::ChatCompletionRequest,
    upstream::traits::CompletionApi,
};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use serde_json::Value;

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    config: UpstreamConfig,
}

impl ImageClient {
    pub fn new(client: Client, config: UpstreamConfig) -> Self {
        Self { client, config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(customer_id) = &self.config.customer_id {
            headers.insert(HeaderName::from_static("customerid"), header_value(customer_id)?);
        }
        if let Some(api_key) = &self.config.api_key {
            headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", api_key))?);
        }
        Ok(headers)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| ImageGenError::Config(format!("Invalid upstream header value: {}", e)))
}

#[async_trait]
impl CompletionApi for ImageClient {
    async fn complete(&self, prompt: &str) -> Result<Value> {
        let payload = ChatCompletionRequest::single_user_message(&self.config.model, prompt);

        log::info!("Generating image with model: {}", self.config.model);
        log::debug!("Upstream prompt: {}", prompt);
        let _timer = logger::timer("upstream image generation");

        let response = self
            .client
            .post(&self.config.endpoint)
            .headers(self.build_headers()?)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                log::error!("AI API request failed: {}", e);
                ImageGenError::Upstream {
                    status: e.status().map(|s| s.as_u16()),
                    body: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("AI API Error: {} {}", status.as_u16(), body);
            return Err(ImageGenError::Upstream {
                status: Some(status.as_u16()),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ImageGenError::Response(format!("Invalid AI service response: {}", e)))
    }
}
