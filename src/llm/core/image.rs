//! Provider-neutral image generation types

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::error::LlmError;

/// Maximum number of images a single request may ask for
pub const MAX_SAMPLE_COUNT: u32 = 4;

/// Supported output aspect ratios
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "4:3")]
    Classic,
    #[serde(rename = "3:4")]
    ClassicPortrait,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Classic => "4:3",
            AspectRatio::ClassicPortrait => "3:4",
        }
    }

    /// Parse a ratio string, falling back to 16:9 for anything unsupported
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim() {
            "1:1" => AspectRatio::Square,
            "9:16" => AspectRatio::Portrait,
            "4:3" => AspectRatio::Classic,
            "3:4" => AspectRatio::ClassicPortrait,
            _ => AspectRatio::Landscape,
        }
    }
}

/// Request to generate one or more images from a text prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRequest {
    /// Description of the image to generate
    pub prompt: String,
    /// What to keep out of the image
    pub negative_prompt: Option<String>,
    /// Output aspect ratio
    pub aspect_ratio: AspectRatio,
    /// Number of images, always within 1..=4
    pub sample_count: u32,
}

impl ImageRequest {
    /// Create a request for a single 16:9 image
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: None,
            aspect_ratio: AspectRatio::default(),
            sample_count: 1,
        }
    }

    /// Set the negative prompt
    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative_prompt.into());
        self
    }

    /// Set the aspect ratio
    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set the number of images, clamped to 1..=4
    pub fn with_sample_count(mut self, sample_count: u32) -> Self {
        self.sample_count = sample_count.clamp(1, MAX_SAMPLE_COUNT);
        self
    }

    /// Reject requests that no provider would accept
    pub fn validate(&self) -> Result<(), LlmError> {
        if self.prompt.trim().is_empty() {
            return Err(LlmError::InvalidRequest(
                "Prompt cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// A decoded image returned by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Raw encoded image bytes (PNG unless `mime_type` says otherwise)
    pub bytes: Vec<u8>,
    /// MIME type reported by the provider
    pub mime_type: String,
}

impl GeneratedImage {
    /// Decode a provider's base64 payload
    pub fn from_base64(data: &str, mime_type: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            bytes: BASE64.decode(data.trim())?,
            mime_type: mime_type.into(),
        })
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    /// Short format name, e.g. `png` for `image/png`
    pub fn format(&self) -> &str {
        self.mime_type
            .strip_prefix("image/")
            .unwrap_or(&self.mime_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_request_defaults() {
        let request = ImageRequest::new("A lighthouse at dusk");
        assert_eq!(request.aspect_ratio, AspectRatio::Landscape);
        assert_eq!(request.sample_count, 1);
        assert!(request.negative_prompt.is_none());
    }

    #[test]
    fn test_sample_count_is_clamped() {
        assert_eq!(ImageRequest::new("x").with_sample_count(0).sample_count, 1);
        assert_eq!(ImageRequest::new("x").with_sample_count(3).sample_count, 3);
        assert_eq!(ImageRequest::new("x").with_sample_count(12).sample_count, 4);
    }

    #[test]
    fn test_validate_rejects_blank_prompt() {
        assert!(ImageRequest::new("   ").validate().is_err());
        assert!(ImageRequest::new("").validate().is_err());
        assert!(ImageRequest::new("a dragon").validate().is_ok());
    }

    #[test]
    fn test_aspect_ratio_parse_falls_back() {
        assert_eq!(AspectRatio::parse_or_default("1:1"), AspectRatio::Square);
        assert_eq!(AspectRatio::parse_or_default("3:4"), AspectRatio::ClassicPortrait);
        assert_eq!(AspectRatio::parse_or_default("21:9"), AspectRatio::Landscape);
        assert_eq!(AspectRatio::parse_or_default(""), AspectRatio::Landscape);
    }

    #[test]
    fn test_aspect_ratio_serializes_as_ratio() {
        let json = serde_json::to_string(&AspectRatio::Portrait).unwrap();
        assert_eq!(json, "\"9:16\"");
    }

    #[test]
    fn test_generated_image_base64() {
        let image = GeneratedImage::from_base64("iVBORw0KGgo=", "image/png").unwrap();
        assert_eq!(image.bytes[1..4], *b"PNG");
        assert_eq!(image.format(), "png");
        assert_eq!(image.to_base64(), "iVBORw0KGgo=");
    }

    #[test]
    fn test_generated_image_rejects_garbage() {
        assert!(GeneratedImage::from_base64("@@@", "image/png").is_err());
    }
}
