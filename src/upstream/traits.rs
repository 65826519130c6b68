use crate::{error::Result, models::FetchedImage};
use async_trait::async_trait;
use serde_json::Value;

/// A completion-style API that turns a prompt into an (unstructured) JSON reply.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    /// Issues exactly one upstream request. Non-success statuses surface as
    /// `ImageGenError::Upstream`.
    async fn complete(&self, prompt: &str) -> Result<Value>;
}

#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedImage>;
}
