//! Sampling settings for text generation

use serde::{Deserialize, Serialize};

/// Output budget and sampling temperature for one text request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Output token budget, including any thinking tokens the model spends
    pub max_tokens: u32,
    /// Clamped to 0.0..=2.0; `None` leaves the model default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl GenerationConfig {
    pub const MAX_TEMPERATURE: f32 = 2.0;

    pub fn new(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            temperature: None,
        }
    }

    /// Settings for story writing: room for a few hundred words after the
    /// model's thinking, and a high temperature for variety
    pub fn story() -> Self {
        Self::new(4096).with_temperature(0.9)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature.clamp(0.0, Self::MAX_TEMPERATURE));
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(1024)
    }
}
