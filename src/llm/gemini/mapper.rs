//! Mapping between abstraction types and Gemini types

use crate::llm::core::{
    config::GenerationConfig,
    error::LlmError,
    types::{
        FinishReason, GenerateRequest, Message, MessageMetadata, MessageRole, StreamEvent,
        UsageMetadata,
    },
};

use super::types::{
    Content, GeminiGenerationConfig, GenerateContentRequest, GenerateContentResponse, Part,
    SystemInstruction,
};

/// Convert our abstraction request to Gemini's request format
pub fn to_gemini_request(request: GenerateRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: request.messages.into_iter().map(to_gemini_content).collect(),
        system_instruction: request.system.map(|s| SystemInstruction {
            parts: vec![Part::text(s)],
        }),
        generation_config: Some(to_gemini_generation_config(request.config)),
    }
}

fn to_gemini_content(message: Message) -> Content {
    let role = match message.role {
        MessageRole::User => "user",
        MessageRole::Assistant => "model",
    };

    Content {
        role: role.to_string(),
        parts: vec![Part::text(message.text)],
    }
}

fn to_gemini_generation_config(config: GenerationConfig) -> GeminiGenerationConfig {
    GeminiGenerationConfig {
        max_output_tokens: Some(config.max_tokens),
        temperature: config.temperature,
    }
}

/// Convert one Gemini response chunk to our stream events
///
/// Only the first candidate is read. Thought parts are dropped. A blocked
/// prompt is reported as an error.
pub fn from_gemini_response(
    response: GenerateContentResponse,
) -> Result<Vec<StreamEvent>, LlmError> {
    let mut events = Vec::new();

    let Some(candidate) = response.candidates.into_iter().next() else {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::ProviderError {
                code: reason,
                message: "Prompt was blocked by the model".to_string(),
            });
        }
        return Ok(events);
    };

    for part in candidate.content.parts {
        if part.thought == Some(true) {
            continue;
        }
        if let Some(text) = part.text {
            events.push(StreamEvent::TextDelta { index: 0, text });
        }
    }

    if let Some(finish_reason) = candidate.finish_reason.as_deref() {
        let usage = response
            .usage_metadata
            .map(|usage| UsageMetadata {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
                total_tokens: usage.total_token_count,
            })
            .unwrap_or_default();

        events.push(StreamEvent::MessageEnd {
            finish_reason: map_finish_reason(finish_reason),
            usage,
        });
    }

    Ok(events)
}

/// Map Gemini's finish reason to our abstraction
fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::MaxTokens,
        "SAFETY" => FinishReason::Safety,
        "RECITATION" => FinishReason::Other("Recitation".to_string()),
        other => FinishReason::Other(other.to_string()),
    }
}

/// Helper to create initial message start event
pub fn create_message_start(message_id: String) -> StreamEvent {
    StreamEvent::MessageStart {
        message: MessageMetadata {
            id: message_id,
            role: MessageRole::Assistant,
        },
    }
}
