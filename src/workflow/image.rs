//! Keyframe image generation step

use async_stream::stream;
use futures::stream::Stream;
use std::pin::Pin;
use std::sync::Arc;

use crate::llm::core::{
    image::{AspectRatio, ImageRequest},
    provider::ImageProvider,
};

use super::error::WorkflowError;
use super::session::{KeyframeImage, Session};

/// Number of keyframes generated per story
pub const KEYFRAME_COUNT: usize = 4;

pub const NEGATIVE_PROMPT: &str = "cartoon, sketch, drawing, low quality, blurry";

const SCENE_TYPES: [&str; KEYFRAME_COUNT] = ["opening scene", "rising action", "climax", "resolution"];

const STYLE_SUFFIX: &str = "Photorealistic, dramatic lighting, high detail, cinematic composition, professional photography style, atmospheric mood";

const FALLBACK_PROMPT: &str = "A beautiful cinematic scene, photorealistic, dramatic lighting";

pub type KeyframeStream<'a> = Pin<Box<dyn Stream<Item = KeyframeImage> + Send + 'a>>;

/// Derive the four keyframe prompts for a story
///
/// Sentences are split on runs of `.`, `!` and `?`. With four or more
/// sentences, the first, the two at one and two thirds, and the last are
/// used. The result always has exactly four prompts.
pub fn extract_image_prompts(story: &str) -> Vec<String> {
    let sentences: Vec<&str> = story
        .split(|c| matches!(c, '.' | '!' | '?'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let total = sentences.len();
    let keyframe_sentences: Vec<&str> = if total < KEYFRAME_COUNT {
        sentences
    } else {
        [0, total / 3, (2 * total) / 3, total - 1]
            .iter()
            .map(|&i| sentences[i])
            .collect()
    };

    let mut prompts: Vec<String> = keyframe_sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| {
            let scene = SCENE_TYPES[i.min(SCENE_TYPES.len() - 1)];
            format!("Cinematic {}: {}. {}", scene, sentence, STYLE_SUFFIX)
        })
        .collect();

    while prompts.len() < KEYFRAME_COUNT {
        let next = prompts
            .last()
            .cloned()
            .unwrap_or_else(|| FALLBACK_PROMPT.to_string());
        prompts.push(next);
    }

    prompts.truncate(KEYFRAME_COUNT);
    prompts
}

/// Generates visual keyframes for the story held in the session
pub struct ImageAgent {
    provider: Arc<dyn ImageProvider>,
}

impl ImageAgent {
    pub const NAME: &'static str = "image_generator";

    pub fn new(provider: Arc<dyn ImageProvider>) -> Self {
        Self { provider }
    }

    /// Stream one record per keyframe, in order, as each image call returns
    ///
    /// Image calls run one after another. A failed call yields a record with
    /// an `error` instead of ending the stream.
    pub fn run(&self, session: &Session) -> Result<KeyframeStream<'_>, WorkflowError> {
        let story = session
            .story()
            .filter(|s| !s.trim().is_empty())
            .ok_or(WorkflowError::MissingStory)?;
        let prompts = extract_image_prompts(story);
        let user_id = session.user_id.clone();

        Ok(Box::pin(stream! {
            for (i, prompt) in prompts.into_iter().enumerate() {
                let keyframe = self.generate_keyframe(i + 1, prompt).await;
                if let Some(error) = keyframe_error(&keyframe) {
                    tracing::warn!(user_id = %user_id, keyframe = keyframe.keyframe, %error, "Keyframe generation failed");
                } else {
                    tracing::debug!(user_id = %user_id, keyframe = keyframe.keyframe, "Keyframe generated");
                }
                yield keyframe;
            }
        }))
    }

    async fn generate_keyframe(&self, keyframe: usize, prompt: String) -> KeyframeImage {
        let request = ImageRequest::new(prompt.clone())
            .with_negative_prompt(NEGATIVE_PROMPT)
            .with_aspect_ratio(AspectRatio::Landscape)
            .with_sample_count(1);

        match self.provider.generate_images(request).await {
            Ok(images) => match images.into_iter().next() {
                Some(image) => KeyframeImage::image(keyframe, prompt, image.to_base64(), image.format()),
                None => KeyframeImage::failed(
                    keyframe,
                    prompt,
                    "Failed to generate image: model returned no images",
                ),
            },
            Err(e) => KeyframeImage::failed(keyframe, prompt, format!("Failed to generate image: {}", e)),
        }
    }
}

fn keyframe_error(keyframe: &KeyframeImage) -> Option<&str> {
    match &keyframe.outcome {
        super::session::KeyframeOutcome::Failed { error } => Some(error),
        super::session::KeyframeOutcome::Image { .. } => None,
    }
}
