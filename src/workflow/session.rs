//! Transient per-request session state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A generated keyframe, or the reason it could not be generated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeImage {
    /// 1-based position in the story
    pub keyframe: usize,
    pub prompt: String,
    #[serde(flatten)]
    pub outcome: KeyframeOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyframeOutcome {
    Image { base64: String, format: String },
    Failed { error: String },
}

impl KeyframeImage {
    pub fn image(
        keyframe: usize,
        prompt: impl Into<String>,
        base64: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        Self {
            keyframe,
            prompt: prompt.into(),
            outcome: KeyframeOutcome::Image {
                base64: base64.into(),
                format: format.into(),
            },
        }
    }

    pub fn failed(keyframe: usize, prompt: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            keyframe,
            prompt: prompt.into(),
            outcome: KeyframeOutcome::Failed {
                error: error.into(),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, KeyframeOutcome::Failed { .. })
    }
}

/// Outcome of the image step, one entry per keyframe in story order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGenerationResult {
    pub success: bool,
    pub story_analyzed: bool,
    pub keyframes_generated: usize,
    pub images: Vec<KeyframeImage>,
}

impl ImageGenerationResult {
    pub fn new(images: Vec<KeyframeImage>) -> Self {
        Self {
            success: true,
            story_analyzed: true,
            keyframes_generated: images.len(),
            images,
        }
    }

    pub fn failures(&self) -> usize {
        self.images.iter().filter(|i| i.is_error()).count()
    }
}

/// State shared by the workflow steps for a single generation request
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    current_story: Option<String>,
    image_result: Option<ImageGenerationResult>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            created_at: Utc::now(),
            current_story: None,
            image_result: None,
        }
    }

    /// Story written by the story step
    pub fn story(&self) -> Option<&str> {
        self.current_story.as_deref()
    }

    pub fn set_story(&mut self, story: impl Into<String>) {
        self.current_story = Some(story.into());
    }

    pub fn image_result(&self) -> Option<&ImageGenerationResult> {
        self.image_result.as_ref()
    }

    pub fn set_image_result(&mut self, result: ImageGenerationResult) {
        self.image_result = Some(result);
    }
}
