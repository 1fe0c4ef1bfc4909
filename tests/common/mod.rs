//! Shared test providers
//!
//! In-memory stand-ins for the Gemini and Imagen clients, so the workflow and
//! the WebSocket dispatch can be exercised without network access.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storygen::llm::{
    EventStream, GenerateRequest, GeneratedImage, ImageProvider, ImageRequest, LlmError,
    LlmProvider, StreamEvent,
};
use storygen::workflow::{ImageAgent, StoryAgent, StoryWorkflow};

/// Streams a fixed story in small chunks and records every request
pub struct ScriptedStory {
    pub story: String,
    pub fail: bool,
    pub requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedStory {
    pub fn new(story: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            story: story.into(),
            fail: false,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            story: String::new(),
            fail: true,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.messages[0].text.clone())
            .collect()
    }
}

#[async_trait]
impl LlmProvider for ScriptedStory {
    async fn stream_generate(&self, request: GenerateRequest) -> Result<EventStream, LlmError> {
        self.requests.lock().unwrap().push(request);
        if self.fail {
            return Err(LlmError::RateLimitExceeded {
                retry_after: Some(Duration::from_secs(30)),
            });
        }

        let chars: Vec<char> = self.story.chars().collect();
        let events: Vec<Result<StreamEvent, LlmError>> = chars
            .chunks(16)
            .map(|chunk| {
                Ok(StreamEvent::TextDelta {
                    index: 0,
                    text: chunk.iter().collect(),
                })
            })
            .collect();
        Ok(Box::pin(futures::stream::iter(events)))
    }
}

/// Returns one PNG per call, failing on the listed 1-based call numbers
pub struct ScriptedImages {
    pub fail_on: Vec<usize>,
    pub requests: Mutex<Vec<ImageRequest>>,
}

impl ScriptedImages {
    pub fn new(fail_on: Vec<usize>) -> Arc<Self> {
        Arc::new(Self {
            fail_on,
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ImageProvider for ScriptedImages {
    async fn generate_images(
        &self,
        request: ImageRequest,
    ) -> Result<Vec<GeneratedImage>, LlmError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len()
        };
        if self.fail_on.contains(&call) {
            return Err(LlmError::ProviderError {
                code: "no_images".to_string(),
                message: "filtered by safety settings".to_string(),
            });
        }
        Ok(vec![GeneratedImage {
            bytes: vec![0x89, b'P', b'N', b'G'],
            mime_type: "image/png".to_string(),
        }])
    }
}

pub fn story_workflow(
    story: Arc<ScriptedStory>,
    images: Option<Arc<ScriptedImages>>,
) -> StoryWorkflow {
    let image_agent = images.map(|provider| ImageAgent::new(provider as Arc<dyn ImageProvider>));
    StoryWorkflow::new(StoryAgent::new(story), image_agent)
}

pub const SAMPLE_STORY: &str = "The lighthouse keeper found a brass key in the sand. \
It opened a door nobody had seen before. Behind it, stairs spiraled down into the cliff. \
At the bottom a sleeping dragon guarded the lamp's first flame. \
She lit her lantern from it and climbed back up. \
That night the lighthouse burned green, and every lost ship came home.";
