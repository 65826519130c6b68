use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_STYLE: &str = "realistic";
pub const DEFAULT_DIMENSIONS: &str = "1024x1024";
pub const DEFAULT_DOWNLOAD_FILENAME: &str = "generated-image.jpg";

pub const STYLES: &[&str] = &[
    "realistic",
    "artistic",
    "cartoon",
    "sci-fi",
    "fantasy",
    "minimalist",
];

pub const DIMENSION_OPTIONS: &[&str] = &["1024x1024", "1024x768", "768x1024", "1152x896", "896x1152"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Parses a `"WxH"` string such as `"1024x768"`.
    pub fn parse(value: &str) -> Option<Self> {
        let (width, height) = value.split_once('x')?;
        Some(Self {
            width: width.trim().parse().ok()?,
            height: height.trim().parse().ok()?,
        })
    }
}

/// One generated artifact as kept in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,
    pub url: String,
    pub prompt: String,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl GeneratedImage {
    pub fn new(url: impl Into<String>, prompt: impl Into<String>) -> Self {
        let timestamp = Utc::now().timestamp_millis();
        Self {
            id: new_image_id(timestamp),
            url: url.into(),
            prompt: prompt.into(),
            timestamp,
            dimensions: None,
            style: None,
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_dimensions(mut self, dimensions: Option<Dimensions>) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn download_filename(&self) -> String {
        format!("ai-image-{}.jpg", self.id)
    }
}

fn new_image_id(timestamp: i64) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut bits = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(9);
    for _ in 0..9 {
        suffix.push(ALPHABET[(bits % 36) as usize] as char);
        bits /= 36;
    }
    format!("img_{}_{}", timestamp, suffix)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            ..Default::default()
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_dimensions(mut self, dimensions: impl Into<String>) -> Self {
        self.dimensions = Some(dimensions.into());
        self
    }
}

/// The uniform envelope returned by the generation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResponse {
    pub fn ok(image_url: impl Into<String>) -> Self {
        Self {
            success: true,
            image_url: Some(image_url.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            image_url: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Raw image bytes fetched from a remote host.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}
