/// Simple Story Example
///
/// Runs the story-to-image workflow once from the command line and prints
/// each event as it arrives. Keyframes are written as image files to the
/// current directory.
///
/// To run this example:
/// 1. Create a .env file in the project root with either:
///    GOOGLE_CLOUD_PROJECT_ID=your-project-id   (story + images, needs ADC:
///                                               gcloud auth application-default login)
///    GOOGLE_API_KEY=your-api-key               (story only)
/// 2. Run: cargo run --example story_simple -- "dragon, castle, magic"

use futures::StreamExt;
use std::env;
use std::sync::Arc;
use storygen::llm::auth::AuthenticationManager;
use storygen::llm::imagen::DEFAULT_IMAGEN_MODEL;
use storygen::llm::{GeminiClient, GeminiModel, ImagenClient, LlmProvider};
use storygen::workflow::{ImageAgent, KeyframeOutcome, StoryAgent, StoryWorkflow, WorkflowEvent};

use base64::Engine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("=== StoryGen - Simple Example ===\n");

    dotenvy::dotenv().ok();

    let keywords = env::args()
        .nth(1)
        .unwrap_or_else(|| "lighthouse, dragon, brass key".to_string());
    let location = env::var("GOOGLE_CLOUD_LOCATION").unwrap_or_else(|_| "us-central1".to_string());

    let (story_provider, image_agent): (Arc<dyn LlmProvider>, Option<ImageAgent>) =
        match env::var("GOOGLE_CLOUD_PROJECT_ID") {
            Ok(project_id) => {
                let auth = Arc::new(AuthenticationManager::new().await?);
                let gemini = GeminiClient::vertex(
                    project_id.clone(),
                    location.clone(),
                    auth.clone(),
                    GeminiModel::Gemini25Flash,
                )?;
                let imagen = ImagenClient::new(project_id, location, auth, DEFAULT_IMAGEN_MODEL)?;
                (Arc::new(gemini), Some(ImageAgent::new(Arc::new(imagen))))
            }
            Err(_) => {
                eprintln!("Warning: GOOGLE_CLOUD_PROJECT_ID not set, generating the story only");
                let api_key = env::var("GOOGLE_API_KEY")?;
                let gemini = GeminiClient::api_key(api_key, GeminiModel::Gemini25Flash)?;
                (Arc::new(gemini), None)
            }
        };

    let workflow = StoryWorkflow::new(StoryAgent::new(story_provider), image_agent);
    println!("Steps: {:?}", workflow.steps());
    println!("Keywords: {}\n", keywords);

    let mut events = workflow.run("demo", keywords);
    while let Some(event) = events.next().await {
        match event? {
            WorkflowEvent::StoryCompleted(story) => {
                println!("Story:");
                println!("─────────");
                println!("{}", story);
                println!("─────────\n");
            }
            WorkflowEvent::StoryEmpty => {
                eprintln!("✗ The model returned no story");
            }
            WorkflowEvent::KeyframeGenerated(keyframe) => match &keyframe.outcome {
                KeyframeOutcome::Image { base64, format } => {
                    let path = format!("keyframe_{}.{}", keyframe.keyframe, format);
                    let bytes = base64::engine::general_purpose::STANDARD.decode(base64)?;
                    std::fs::write(&path, bytes)?;
                    println!("✓ Keyframe {} saved to {}", keyframe.keyframe, path);
                    println!("  Prompt: {}", keyframe.prompt);
                }
                KeyframeOutcome::Failed { error } => {
                    eprintln!("✗ Keyframe {}: {}", keyframe.keyframe, error);
                }
            },
            WorkflowEvent::ImagesCompleted(result) => {
                println!(
                    "\n{} keyframes, {} failed",
                    result.keyframes_generated,
                    result.failures()
                );
            }
        }
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
