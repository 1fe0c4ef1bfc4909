//! Provider traits for text and image models

use async_trait::async_trait;
use futures::stream::Stream;
use futures::StreamExt;
use std::pin::Pin;

use super::{
    error::LlmError,
    image::{GeneratedImage, ImageRequest},
    types::{FinishReason, GenerateRequest, StreamEvent, UsageMetadata},
};

/// Stream of incremental generation events
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send>>;

/// Main interface that all text model implementations must satisfy
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Stream generate content from the LLM
    ///
    /// This method sends a request to the LLM and returns a stream of events
    /// representing the incremental response.
    async fn stream_generate(&self, request: GenerateRequest) -> Result<EventStream, LlmError>;
}

/// Interface for image generation models
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generate `request.sample_count` images for the prompt
    ///
    /// Implementations return at least one image on success.
    async fn generate_images(&self, request: ImageRequest)
        -> Result<Vec<GeneratedImage>, LlmError>;
}

/// Text accumulated from a finished stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedText {
    pub text: String,
    pub finish_reason: Option<FinishReason>,
    pub usage: UsageMetadata,
}

/// Drain a generation stream into its full text
///
/// An `Error` event, or an `Err` item, aborts collection.
pub async fn collect_text(mut stream: EventStream) -> Result<CollectedText, LlmError> {
    let mut collected = CollectedText::default();

    while let Some(event) = stream.next().await {
        match event? {
            StreamEvent::TextDelta { text, .. } => collected.text.push_str(&text),
            StreamEvent::MessageEnd {
                finish_reason,
                usage,
            } => {
                collected.finish_reason = Some(finish_reason);
                collected.usage.add(&usage);
            }
            StreamEvent::Error { error } => return Err(LlmError::StreamError(error)),
            StreamEvent::MessageStart { .. } => {}
        }
    }

    Ok(collected)
}
