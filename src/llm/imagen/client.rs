//! Imagen client implementation

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::llm::auth::AuthenticationManager;
use crate::llm::core::{
    error::LlmError,
    image::{GeneratedImage, ImageRequest},
    provider::ImageProvider,
};

use super::types::{PredictRequest, PredictResponse};

/// Default Imagen model on Vertex AI
pub const DEFAULT_IMAGEN_MODEL: &str = "imagegeneration@006";

/// Client for generating images with Imagen on Vertex AI
pub struct ImagenClient {
    http_client: Client,
    auth_manager: Arc<AuthenticationManager>,
    project_id: String,
    location: String,
    model: String,
}

impl ImagenClient {
    /// Create a new Imagen client
    ///
    /// # Arguments
    ///
    /// * `project_id` - GCP project ID
    /// * `location` - GCP location (e.g., "us-central1")
    /// * `auth_manager` - shared ADC token source
    /// * `model` - Imagen model id, e.g. `imagegeneration@006`
    pub fn new(
        project_id: String,
        location: String,
        auth_manager: Arc<AuthenticationManager>,
        model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        if project_id.trim().is_empty() {
            return Err(LlmError::InvalidRequest(
                "Google Cloud Project ID not configured".to_string(),
            ));
        }

        // Image synthesis is slow; bound the whole call, not just the connect.
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| LlmError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            auth_manager,
            project_id,
            location,
            model: model.into(),
        })
    }

    fn build_endpoint_url(&self) -> String {
        predict_url(&self.project_id, &self.location, &self.model)
    }
}

fn predict_url(project_id: &str, location: &str, model: &str) -> String {
    format!(
        "https://{}-aiplatform.googleapis.com/v1/projects/{}/locations/{}/publishers/google/models/{}:predict",
        location, project_id, location, model
    )
}

/// Decode the images in a predict response
///
/// Filtered samples are skipped; a response with no usable image is an error.
fn decode_predictions(response: PredictResponse) -> Result<Vec<GeneratedImage>, LlmError> {
    let mut images = Vec::new();
    let mut filtered_reason = None;

    for prediction in response.predictions {
        match prediction.bytes_base64_encoded {
            Some(data) => {
                let mime_type = prediction
                    .mime_type
                    .unwrap_or_else(|| "image/png".to_string());
                images.push(GeneratedImage::from_base64(&data, mime_type)?);
            }
            None => filtered_reason = prediction.rai_filtered_reason.or(filtered_reason),
        }
    }

    if images.is_empty() {
        return Err(LlmError::ProviderError {
            code: "no_images".to_string(),
            message: filtered_reason
                .unwrap_or_else(|| "Model returned no images".to_string()),
        });
    }

    Ok(images)
}

#[async_trait]
impl ImageProvider for ImagenClient {
    async fn generate_images(
        &self,
        request: ImageRequest,
    ) -> Result<Vec<GeneratedImage>, LlmError> {
        request.validate()?;

        let token = self.auth_manager.get_token().await?;
        let body = PredictRequest::from(request);

        let response = self
            .http_client
            .post(self.build_endpoint_url())
            .header("Authorization", format!("Bearer {}", token))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status(
                status.as_u16(),
                retry_after.as_deref(),
                body,
            ));
        }

        let predict: PredictResponse = response.json().await?;
        decode_predictions(predict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::imagen::types::Prediction;

    fn prediction(data: Option<&str>, reason: Option<&str>) -> Prediction {
        Prediction {
            bytes_base64_encoded: data.map(str::to_string),
            mime_type: data.map(|_| "image/png".to_string()),
            rai_filtered_reason: reason.map(str::to_string),
        }
    }

    #[test]
    fn test_predict_url() {
        let url = predict_url("my-project", "us-central1", DEFAULT_IMAGEN_MODEL);
        assert_eq!(
            url,
            "https://us-central1-aiplatform.googleapis.com/v1/projects/my-project/locations/us-central1/publishers/google/models/imagegeneration@006:predict"
        );
    }

    #[test]
    fn test_decode_predictions() {
        let response = PredictResponse {
            predictions: vec![prediction(Some("iVBORw0KGgo="), None)],
        };
        let images = decode_predictions(response).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].format(), "png");
    }

    #[test]
    fn test_decode_predictions_skips_filtered() {
        let response = PredictResponse {
            predictions: vec![
                prediction(None, Some("blocked")),
                prediction(Some("iVBORw0KGgo="), None),
            ],
        };
        assert_eq!(decode_predictions(response).unwrap().len(), 1);
    }

    #[test]
    fn test_decode_predictions_all_filtered() {
        let response = PredictResponse {
            predictions: vec![prediction(None, Some("Image was filtered for safety"))],
        };
        let err = decode_predictions(response).unwrap_err();
        assert!(err.to_string().contains("filtered for safety"));
    }

    #[test]
    fn test_decode_predictions_empty() {
        let err = decode_predictions(PredictResponse::default()).unwrap_err();
        assert!(matches!(err, LlmError::ProviderError { code, .. } if code == "no_images"));
    }
}
