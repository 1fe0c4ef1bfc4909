//! Story generation step

use std::sync::Arc;

use crate::llm::core::{
    config::GenerationConfig,
    provider::{collect_text, LlmProvider},
    types::GenerateRequest,
};

use super::error::WorkflowError;
use super::session::Session;

pub const STORYTELLER_INSTRUCTION: &str = "You are a creative storyteller AI. Your task is to generate engaging short stories based on keywords provided by users.

Guidelines for story generation:
- Create stories that are approximately 200-400 words long
- Use vivid descriptions and engaging narrative
- Incorporate all provided keywords naturally into the story
- Maintain a consistent tone and style
- Create compelling characters and interesting plot developments
- Ensure the story has a clear beginning, middle, and end
- Be creative and imaginative while keeping the content appropriate for all audiences

When given keywords, weave them into a cohesive, complete narrative. Focus only on generating the story text - do not include any instructions about image generation or other tasks.";

/// Generates a short story from user keywords with a text model
pub struct StoryAgent {
    provider: Arc<dyn LlmProvider>,
    config: GenerationConfig,
}

impl StoryAgent {
    pub const NAME: &'static str = "storyteller";

    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            config: GenerationConfig::story(),
        }
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// User prompt for `keywords`, inserted verbatim
    pub fn build_prompt(keywords: &str) -> String {
        format!(
            "Generate a creative short story based on these keywords: {}",
            keywords
        )
    }

    /// Generate the story and store it in the session
    ///
    /// Returns the trimmed story, which may be empty if the model produced
    /// no text.
    pub async fn generate(
        &self,
        session: &mut Session,
        keywords: &str,
    ) -> Result<String, WorkflowError> {
        let request = GenerateRequest::single(
            Self::build_prompt(keywords),
            Some(STORYTELLER_INSTRUCTION.to_string()),
            self.config,
        );

        let stream = self.provider.stream_generate(request).await?;
        let collected = collect_text(stream).await?;
        let story = collected.text.trim().to_string();

        tracing::info!(
            user_id = %session.user_id,
            session_id = %session.id,
            chars = story.len(),
            output_tokens = collected.usage.output_tokens,
            finish_reason = ?collected.finish_reason,
            "Story generated"
        );

        session.set_story(story.clone());
        Ok(story)
    }
}
