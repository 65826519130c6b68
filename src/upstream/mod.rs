pub mod fetch_client;
pub mod image_client;
#[cfg(test)]
pub(crate) mod mock;
pub mod traits;

use crate::config::UpstreamConfig;
use reqwest::Client;
use std::sync::Arc;

pub use fetch_client::FetchClient;
pub use image_client::ImageClient;
pub use traits::{CompletionApi, ImageFetcher};

/// Both outbound HTTP concerns, sharing one connection pool.
#[derive(Clone)]
pub struct UpstreamClient {
    image_client: ImageClient,
    fetch_client: FetchClient,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Self {
        let client = Client::new();

        if config.api_key.is_none() {
            log::warn!("No upstream API key configured, requests will be sent unauthenticated");
        }

        Self {
            image_client: ImageClient::new(client.clone(), config),
            fetch_client: FetchClient::new(client),
        }
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn fetch(&self) -> &FetchClient {
        &self.fetch_client
    }

    pub fn completion_api(&self) -> Arc<dyn CompletionApi> {
        Arc::new(self.image_client.clone())
    }

    pub fn image_fetcher(&self) -> Arc<dyn ImageFetcher> {
        Arc::new(self.fetch_client.clone())
    }
}
