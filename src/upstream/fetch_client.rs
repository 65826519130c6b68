use crate::{
    error::{ImageGenError, Result},
    models::FetchedImage,
    upstream::traits::ImageFetcher,
};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};

#[derive(Clone)]
pub struct FetchClient {
    client: Client,
}

impl FetchClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for FetchClient {
    async fn fetch(&self, url: &str) -> Result<FetchedImage> {
        log::info!("Fetching image for download: {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Image host answered {} for {}", status.as_u16(), url);
            return Err(ImageGenError::FetchFailed(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = response.bytes().await?.to_vec();

        log::debug!("Fetched {} bytes ({:?})", bytes.len(), content_type);
        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }
}
