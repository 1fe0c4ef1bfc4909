//! Story-to-image workflow
//!
//! The workflow is a fixed, ordered pair of steps:
//! 1. [`StoryAgent`] turns the user's keywords into a short story
//! 2. [`ImageAgent`] derives four keyframe prompts from the story and
//!    generates one image per prompt
//!
//! The image step only exists when an image provider was configured.
//! Results are streamed as [`WorkflowEvent`]s while the steps run, so the
//! caller can forward the story before any image is ready.

mod error;
pub mod image;
pub mod session;
pub mod story;

pub use error::WorkflowError;
pub use image::{extract_image_prompts, ImageAgent};
pub use session::{ImageGenerationResult, KeyframeImage, KeyframeOutcome, Session};
pub use story::StoryAgent;

use async_stream::stream;
use futures::stream::Stream;
use futures::StreamExt;
use std::pin::Pin;

/// Events emitted by the workflow while it runs
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    /// The story step produced a non-empty story
    StoryCompleted(String),

    /// The story step produced no text; the image step is skipped
    StoryEmpty,

    /// One keyframe finished, successfully or with an inline error
    KeyframeGenerated(KeyframeImage),

    /// All keyframes finished
    ImagesCompleted(ImageGenerationResult),
}

pub type WorkflowStream<'a> =
    Pin<Box<dyn Stream<Item = Result<WorkflowEvent, WorkflowError>> + Send + 'a>>;

/// Sequential story-then-images workflow
pub struct StoryWorkflow {
    story_agent: StoryAgent,
    image_agent: Option<ImageAgent>,
}

impl StoryWorkflow {
    pub const NAME: &'static str = "story_to_image_workflow";

    pub fn new(story_agent: StoryAgent, image_agent: Option<ImageAgent>) -> Self {
        Self {
            story_agent,
            image_agent,
        }
    }

    pub fn images_enabled(&self) -> bool {
        self.image_agent.is_some()
    }

    /// Names of the steps, in execution order
    pub fn steps(&self) -> Vec<&'static str> {
        let mut steps = vec![StoryAgent::NAME];
        if self.image_agent.is_some() {
            steps.push(ImageAgent::NAME);
        }
        steps
    }

    /// Run the workflow for one request
    ///
    /// A fresh [`Session`] carries the story from the first step to the
    /// second. The stream ends after the last event; a story failure is
    /// yielded as an `Err` and ends the stream.
    pub fn run(&self, user_id: impl Into<String>, keywords: impl Into<String>) -> WorkflowStream<'_> {
        let user_id = user_id.into();
        let keywords = keywords.into();

        Box::pin(stream! {
            let mut session = Session::new(user_id);

            let story = match self.story_agent.generate(&mut session, &keywords).await {
                Ok(story) => story,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            if story.is_empty() {
                tracing::warn!(user_id = %session.user_id, "Empty response text from story step");
                yield Ok(WorkflowEvent::StoryEmpty);
                return;
            }

            yield Ok(WorkflowEvent::StoryCompleted(story));

            let Some(image_agent) = &self.image_agent else {
                tracing::info!(user_id = %session.user_id, "Image generation disabled, story only");
                return;
            };

            let mut keyframes = match image_agent.run(&session) {
                Ok(keyframes) => keyframes,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let mut images = Vec::new();
            while let Some(keyframe) = keyframes.next().await {
                images.push(keyframe.clone());
                yield Ok(WorkflowEvent::KeyframeGenerated(keyframe));
            }
            drop(keyframes);

            session.set_image_result(ImageGenerationResult::new(images));
            if let Some(result) = session.image_result().cloned() {
                tracing::info!(
                    user_id = %session.user_id,
                    session_id = %session.id,
                    keyframes = result.keyframes_generated,
                    failures = result.failures(),
                    "Workflow completed"
                );
                yield Ok(WorkflowEvent::ImagesCompleted(result));
            }
        })
    }
}
