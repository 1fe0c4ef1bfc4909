//! Gemini client implementation

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::llm::auth::AuthenticationManager;
use crate::llm::core::{
    error::LlmError,
    provider::{EventStream, LlmProvider},
    types::GenerateRequest,
};

use super::mapper::{create_message_start, from_gemini_response, to_gemini_request};
use super::sse::parse_sse_stream;

/// Gemini model identifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeminiModel {
    /// Gemini 2.5 Pro
    Gemini25Pro,
    /// Gemini 2.5 Flash
    #[default]
    Gemini25Flash,
    /// Gemini 2.5 Flash Lite
    Gemini25FlashLite,
}

impl GeminiModel {
    /// Get the model identifier string
    pub fn as_str(&self) -> &'static str {
        match self {
            GeminiModel::Gemini25Pro => "gemini-2.5-pro",
            GeminiModel::Gemini25Flash => "gemini-2.5-flash",
            GeminiModel::Gemini25FlashLite => "gemini-2.5-flash-lite",
        }
    }
}

impl fmt::Display for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeminiModel {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "gemini-2.5-pro" => Ok(GeminiModel::Gemini25Pro),
            "gemini-2.5-flash" => Ok(GeminiModel::Gemini25Flash),
            "gemini-2.5-flash-lite" => Ok(GeminiModel::Gemini25FlashLite),
            other => Err(LlmError::InvalidRequest(format!(
                "Unknown Gemini model: {}",
                other
            ))),
        }
    }
}

/// Where Gemini requests are sent and how they are authenticated
pub enum GeminiBackend {
    /// Vertex AI, authenticated with Application Default Credentials
    Vertex {
        project_id: String,
        location: String,
        auth_manager: Arc<AuthenticationManager>,
    },
    /// Gemini Developer API, authenticated with an API key
    ApiKey { api_key: String },
}

/// Client for streaming text from Gemini models
pub struct GeminiClient {
    http_client: Client,
    backend: GeminiBackend,
    model: GeminiModel,
}

impl GeminiClient {
    /// Create a client that talks to Vertex AI
    pub fn vertex(
        project_id: String,
        location: String,
        auth_manager: Arc<AuthenticationManager>,
        model: GeminiModel,
    ) -> Result<Self, LlmError> {
        Self::with_backend(
            GeminiBackend::Vertex {
                project_id,
                location,
                auth_manager,
            },
            model,
        )
    }

    /// Create a client that talks to the Gemini Developer API
    pub fn api_key(api_key: String, model: GeminiModel) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::AuthenticationError(
                "Gemini API key is empty".to_string(),
            ));
        }
        Self::with_backend(GeminiBackend::ApiKey { api_key }, model)
    }

    fn with_backend(backend: GeminiBackend, model: GeminiModel) -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| LlmError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            backend,
            model,
        })
    }

    pub fn model(&self) -> GeminiModel {
        self.model
    }

    /// Build the endpoint URL for streaming
    fn build_endpoint_url(&self) -> String {
        endpoint_url(&self.backend, self.model)
    }

    async fn make_streaming_request(&self, request: GenerateRequest) -> Result<EventStream, LlmError> {
        let gemini_request = to_gemini_request(request);

        let url = self.build_endpoint_url();
        let mut builder = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json");

        builder = match &self.backend {
            GeminiBackend::Vertex { auth_manager, .. } => {
                let token = auth_manager.get_token().await?;
                builder.header("Authorization", format!("Bearer {}", token))
            }
            GeminiBackend::ApiKey { api_key } => builder.header("x-goog-api-key", api_key),
        };

        let response = builder.json(&gemini_request).send().await?;

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

        let sse_stream = parse_sse_stream(Box::pin(response.bytes_stream()));

        let message_id = Uuid::new_v4().to_string();
        let mut emitted_start = false;

        let event_stream = sse_stream.flat_map(move |result| {
            let events = match result.and_then(from_gemini_response) {
                Ok(response_events) => {
                    let mut events = Vec::with_capacity(response_events.len() + 1);
                    if !emitted_start {
                        events.push(Ok(create_message_start(message_id.clone())));
                        emitted_start = true;
                    }
                    events.extend(response_events.into_iter().map(Ok));
                    events
                }
                Err(e) => vec![Err(e)],
            };
            futures::stream::iter(events)
        });

        Ok(Box::pin(event_stream))
    }
}

fn endpoint_url(backend: &GeminiBackend, model: GeminiModel) -> String {
    match backend {
        GeminiBackend::Vertex {
            project_id,
            location,
            ..
        } => format!(
            "https://{}-aiplatform.googleapis.com/v1/projects/{}/locations/{}/publishers/google/models/{}:streamGenerateContent?alt=sse",
            location, project_id, location, model.as_str()
        ),
        GeminiBackend::ApiKey { .. } => format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:streamGenerateContent?alt=sse",
            model.as_str()
        ),
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    async fn stream_generate(&self, request: GenerateRequest) -> Result<EventStream, LlmError> {
        self.make_streaming_request(request).await
    }
}
