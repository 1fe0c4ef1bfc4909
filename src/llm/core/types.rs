//! Core types for the LLM abstraction layer

use serde::{Deserialize, Serialize};

use super::config::GenerationConfig;

/// Request to generate content from an LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Conversation history
    pub messages: Vec<Message>,
    /// Generation parameters
    pub config: GenerationConfig,
    /// System prompt/instructions
    pub system: Option<String>,
}

impl GenerateRequest {
    /// Single-turn request with an optional system instruction
    pub fn single(prompt: impl Into<String>, system: Option<String>, config: GenerationConfig) -> Self {
        Self {
            messages: vec![Message::user(prompt)],
            config,
            system,
        }
    }
}

/// A single text message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,
    /// Message text
    pub text: String,
}

impl Message {
    /// Create a new user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
        }
    }

    /// Create a new assistant message
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: text.into(),
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Human input
    User,
    /// Model output
    Assistant,
}

/// Events emitted during streaming generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Response begins
    MessageStart { message: MessageMetadata },
    /// Text token(s) for the candidate at `index`
    TextDelta { index: usize, text: String },
    /// Response complete
    MessageEnd {
        finish_reason: FinishReason,
        usage: UsageMetadata,
    },
    /// Error occurred
    Error { error: String },
}

/// Metadata about a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Message ID
    pub id: String,
    /// Message role
    pub role: MessageRole,
}

/// Reason why generation finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural completion
    Stop,
    /// Hit token limit
    MaxTokens,
    /// Blocked by safety filters
    Safety,
    /// Provider-specific reason
    Other(String),
}

/// Token usage information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetadata {
    /// Prompt tokens consumed
    pub input_tokens: u32,
    /// Response tokens generated
    pub output_tokens: u32,
    /// Sum of input and output
    pub total_tokens: u32,
}

impl UsageMetadata {
    /// Create new usage metadata
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }

    /// Add usage from another metadata
    pub fn add(&mut self, other: &UsageMetadata) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
        self.total_tokens = self.input_tokens + self.output_tokens;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.text, "Hello");

        let msg = Message::assistant("Once upon a time");
        assert_eq!(msg.role, MessageRole::Assistant);
    }

    #[test]
    fn test_single_request() {
        let request = GenerateRequest::single(
            "Tell me a story",
            Some("You are a storyteller".to_string()),
            GenerationConfig::new(256),
        );
        assert_eq!(request.messages, vec![Message::user("Tell me a story")]);
        assert_eq!(request.system.as_deref(), Some("You are a storyteller"));
        assert_eq!(request.config.max_tokens, 256);
    }

    #[test]
    fn test_usage_metadata_add() {
        let mut usage = UsageMetadata::new(100, 50);
        assert_eq!(usage.total_tokens, 150);
        usage.add(&UsageMetadata::new(20, 30));
        assert_eq!(usage.input_tokens, 120);
        assert_eq!(usage.output_tokens, 80);
        assert_eq!(usage.total_tokens, 200);
    }

    #[test]
    fn test_stream_event_serialization() {
        let event = StreamEvent::TextDelta {
            index: 0,
            text: "Once".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"text_delta\""));
        assert!(json.contains("\"text\":\"Once\""));
    }

    #[test]
    fn test_finish_reason_serialization() {
        assert_eq!(serde_json::to_string(&FinishReason::Stop).unwrap(), "\"stop\"");
        assert_eq!(
            serde_json::to_string(&FinishReason::MaxTokens).unwrap(),
            "\"max_tokens\""
        );
    }
}
