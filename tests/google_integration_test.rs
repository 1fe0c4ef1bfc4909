//! Integration tests against the live Google APIs
//!
//! These tests make real API calls. To run them:
//! 1. Copy `.env.example` to `.env` and set `GOOGLE_CLOUD_PROJECT_ID`
//!    (or `GOOGLE_API_KEY` for the Gemini-only test)
//! 2. For Vertex AI, run `gcloud auth application-default login`
//! 3. Run: `cargo test --test google_integration_test -- --ignored`

use std::env;
use std::sync::Arc;
use storygen::llm::auth::AuthenticationManager;
use storygen::llm::imagen::DEFAULT_IMAGEN_MODEL;
use storygen::llm::{
    collect_text, AspectRatio, GeminiClient, GeminiModel, GenerateRequest, GenerationConfig,
    ImageProvider, ImageRequest, ImagenClient, LlmProvider,
};
use storygen::workflow::{extract_image_prompts, StoryAgent};

fn location() -> String {
    env::var("GOOGLE_CLOUD_LOCATION").unwrap_or_else(|_| "us-central1".to_string())
}

async fn gemini_client() -> GeminiClient {
    dotenvy::dotenv().ok();

    match env::var("GOOGLE_CLOUD_PROJECT_ID") {
        Ok(project_id) => {
            let auth = AuthenticationManager::new()
                .await
                .expect("Failed to load application default credentials");
            GeminiClient::vertex(project_id, location(), Arc::new(auth), GeminiModel::Gemini25Flash)
                .expect("Failed to create Gemini client")
        }
        Err(_) => {
            let api_key = env::var("GOOGLE_API_KEY")
                .expect("GOOGLE_CLOUD_PROJECT_ID or GOOGLE_API_KEY required in .env");
            GeminiClient::api_key(api_key, GeminiModel::Gemini25Flash)
                .expect("Failed to create Gemini client")
        }
    }
}

#[tokio::test]
#[ignore] // Run with --ignored flag
async fn test_gemini_simple_generation() {
    let client = gemini_client().await;

    let request = GenerateRequest::single(
        "What is 2+2? Answer with just the number.",
        None,
        GenerationConfig::new(256),
    );
    let stream = client.stream_generate(request).await.expect("Failed to start stream");
    let collected = collect_text(stream).await.expect("Stream error");

    println!("Response: {}", collected.text);
    assert!(collected.text.contains('4'));
    assert!(collected.usage.total_tokens > 0);
}

#[tokio::test]
#[ignore] // Run with --ignored flag
async fn test_story_prompt_produces_keyframes() {
    let client = gemini_client().await;

    let request = GenerateRequest::single(
        StoryAgent::build_prompt("lighthouse, dragon, brass key"),
        Some(storygen::workflow::story::STORYTELLER_INSTRUCTION.to_string()),
        GenerationConfig::story(),
    );
    let stream = client.stream_generate(request).await.expect("Failed to start stream");
    let story = collect_text(stream).await.expect("Stream error").text;

    println!("Story: {}", story);
    assert!(story.split_whitespace().count() > 50);
    assert_eq!(extract_image_prompts(&story).len(), 4);
}

#[tokio::test]
#[ignore] // Run with --ignored flag
async fn test_imagen_generates_one_image() {
    dotenvy::dotenv().ok();

    let project_id = env::var("GOOGLE_CLOUD_PROJECT_ID").expect("GOOGLE_CLOUD_PROJECT_ID required in .env");
    let auth = AuthenticationManager::new()
        .await
        .expect("Failed to load application default credentials");
    let client = ImagenClient::new(project_id, location(), Arc::new(auth), DEFAULT_IMAGEN_MODEL)
        .expect("Failed to create Imagen client");

    let request = ImageRequest::new("A lighthouse on a cliff at dusk, photorealistic")
        .with_aspect_ratio(AspectRatio::Landscape)
        .with_sample_count(1);
    let images = client.generate_images(request).await.expect("Image generation failed");

    assert_eq!(images.len(), 1);
    assert!(!images[0].bytes.is_empty());
    assert!(images[0].mime_type.starts_with("image/"));
}
