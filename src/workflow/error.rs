use crate::llm::core::error::LlmError;

/// Errors that can occur while running the story workflow
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// Error from the text model
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// The image step ran without a story in the session
    #[error("No story text found in session state for image generation")]
    MissingStory,
}
