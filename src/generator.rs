use crate::{
    client::StudioApi,
    error::{ImageGenError, Result},
    history::HistoryStore,
    models::{Dimensions, GeneratedImage, GenerationRequest},
};
use std::sync::Arc;
use std::time::{Duration, Instant};

const GENERIC_FAILURE: &str = "Failed to generate image. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationState {
    Idle,
    Generating,
    Failed(String),
    Done {
        image: GeneratedImage,
        elapsed: Duration,
    },
}

/// Drives one user session: prompt submission, result state and history.
pub struct Generator {
    api: Arc<dyn StudioApi>,
    history: HistoryStore,
    state: GenerationState,
}

impl Generator {
    pub fn new(api: Arc<dyn StudioApi>, history: HistoryStore) -> Self {
        Self {
            api,
            history,
            state: GenerationState::Idle,
        }
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Submits a prompt and records the outcome. Blank prompts are ignored.
    pub async fn submit(&mut self, prompt: &str, style: &str, dimensions: &str) -> &GenerationState {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            log::debug!("Ignoring blank prompt");
            return &self.state;
        }

        self.state = GenerationState::Generating;
        let started = Instant::now();

        let request = GenerationRequest::new(prompt)
            .with_style(style)
            .with_dimensions(dimensions);
        let response = self.api.generate_image(&request).await;

        self.state = match response.image_url.filter(|_| response.success) {
            Some(url) => {
                let image = GeneratedImage::new(url, prompt)
                    .with_style(style)
                    .with_dimensions(Dimensions::parse(dimensions));
                self.history.insert(image.clone());
                GenerationState::Done {
                    image,
                    elapsed: started.elapsed(),
                }
            }
            None => GenerationState::Failed(
                response
                    .error
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            ),
        };
        &self.state
    }

    pub fn remove(&mut self, id: &str) {
        self.history.remove(id);
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.state = GenerationState::Idle;
    }

    /// Fetches a history entry's bytes through the download endpoint.
    pub async fn download(&self, id: &str) -> Result<(String, Vec<u8>)> {
        let image = self
            .history
            .get(id)
            .ok_or_else(|| ImageGenError::InvalidInput(format!("No image with id {}", id)))?;

        let filename = image.download_filename();
        let bytes = self.api.download_image(&image.url, &filename).await?;
        Ok((filename, bytes))
    }
}
