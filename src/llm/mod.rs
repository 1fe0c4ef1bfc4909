//! LLM Abstraction Layer
//!
//! Provider-neutral traits for text and image generation, with Gemini (text)
//! and Imagen (images) implementations on Google Cloud.

pub mod auth;
pub mod core;
pub mod gemini;
pub mod imagen;

// Re-export commonly used types
pub use self::core::{
    config::GenerationConfig,
    error::LlmError,
    image::{AspectRatio, GeneratedImage, ImageRequest},
    provider::{collect_text, CollectedText, EventStream, ImageProvider, LlmProvider},
    types::{FinishReason, GenerateRequest, Message, MessageRole, StreamEvent, UsageMetadata},
};
pub use gemini::{GeminiClient, GeminiModel};
pub use imagen::ImagenClient;
