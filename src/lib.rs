pub mod client;
pub mod config;
pub mod error;
pub mod generator;
pub mod history;
pub mod logger;
pub mod models;
pub mod normalizer;
pub mod prompt;
#[cfg(feature = "server")]
pub mod server;
pub mod service;
pub mod upstream;

pub use client::{StudioApi, StudioClient};
pub use config::{Config, HistoryConfig, ServerConfig, UpstreamConfig};
pub use error::{ImageGenError, Result};
pub use generator::{GenerationState, Generator};
pub use history::{FilePersistence, HistoryPersistence, HistoryStore, MemoryPersistence};
pub use models::*;
pub use normalizer::extract_image_url;
pub use prompt::enhance_prompt;
pub use service::{Download, ImageService};
pub use upstream::{CompletionApi, ImageFetcher, UpstreamClient};
