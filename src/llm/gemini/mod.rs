//! Gemini provider implementation
//!
//! Streams text from Gemini models, either on Vertex AI or through the
//! Gemini Developer API, implementing the LlmProvider trait.

pub mod client;
pub mod mapper;
pub mod sse;
pub mod types;

pub use client::{GeminiBackend, GeminiClient, GeminiModel};
