//! Imagen `predict` request and response types

use serde::{Deserialize, Serialize};

use crate::llm::core::image::ImageRequest;

#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    pub instances: Vec<PredictInstance>,
    pub parameters: PredictParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictInstance {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictParameters {
    pub sample_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    pub aspect_ratio: String,
}

impl From<ImageRequest> for PredictRequest {
    fn from(request: ImageRequest) -> Self {
        Self {
            instances: vec![PredictInstance {
                prompt: request.prompt,
            }],
            parameters: PredictParameters {
                sample_count: request.sample_count,
                negative_prompt: request.negative_prompt,
                aspect_ratio: request.aspect_ratio.as_str().to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictResponse {
    /// Missing entirely when every sample was filtered
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    #[serde(default)]
    pub bytes_base64_encoded: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Set instead of image bytes when a sample was filtered
    #[serde(default)]
    pub rai_filtered_reason: Option<String>,
}
