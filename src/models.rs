// WebSocket and HTTP payloads

use serde::{Deserialize, Deserializer, Serialize};

use crate::workflow::KeyframeImage;

/// Keywords supplied by the client
///
/// A JSON string is kept verbatim; a list of strings is joined with `", "`.
/// Anything else is kept as its JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keywords(pub String);

impl Keywords {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Keywords {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let keywords = match value {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s,
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
            other => other.to_string(),
        };
        Ok(Keywords(keywords))
    }
}

// Client -> server
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    GenerateStory {
        #[serde(default)]
        data: Keywords,
    },
    Ping,
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// Parse one text frame
    ///
    /// Anything but a JSON object is an error. An object whose `type` is
    /// missing or not a string is [`ClientMessage::Unknown`].
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let Some(object) = value.as_object() else {
            return Err(serde::de::Error::custom(format!(
                "expected a JSON object, got {}",
                value
            )));
        };
        if !object.get("type").is_some_and(serde_json::Value::is_string) {
            return Ok(ClientMessage::Unknown);
        }
        serde_json::from_value(value)
    }
}

// Server -> client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Connected { message: String },
    Processing { message: String },
    StoryComplete { data: String },
    ImageGenerated { data: KeyframeImage },
    TurnComplete { turn_complete: bool, interrupted: bool },
    Error { message: String },
    Pong,
}

impl ServerMessage {
    pub fn connected() -> Self {
        ServerMessage::Connected {
            message: "Connected to StoryGen backend".to_string(),
        }
    }

    pub fn processing() -> Self {
        ServerMessage::Processing {
            message: "Generating story and images...".to_string(),
        }
    }

    pub fn turn_complete() -> Self {
        ServerMessage::TurnComplete {
            turn_complete: true,
            interrupted: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }
}

// HTTP responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub workflow: String,
    pub image_generation: bool,
}
