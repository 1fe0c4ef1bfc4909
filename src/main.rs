use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use storygen::config::{Config, StoryBackend};
use storygen::llm::auth::AuthenticationManager;
use storygen::llm::{GeminiClient, ImagenClient};
use storygen::routes::configure_routes;
use storygen::workflow::{ImageAgent, StoryAgent, StoryWorkflow};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("storygen=info,warn")),
        )
        .with_target(false)
        .init();

    let config = Config::parse();
    let workflow = Arc::new(build_workflow(&config).await?);
    let routes = configure_routes(workflow.clone(), &config.cors_origins()?);

    let addr = config.socket_addr();
    tracing::info!(
        %addr,
        workflow = StoryWorkflow::NAME,
        model = %config.story_model,
        image_generation = workflow.images_enabled(),
        steps = ?workflow.steps(),
        "Starting StoryGen backend"
    );
    warp::serve(routes).run(addr).await;

    Ok(())
}

async fn build_workflow(config: &Config) -> anyhow::Result<StoryWorkflow> {
    let auth_manager = match config.project_id() {
        Some(_) => Some(Arc::new(
            AuthenticationManager::new()
                .await
                .context("Failed to load Google Cloud application default credentials")?,
        )),
        None => None,
    };

    let story_client = match config.story_backend()? {
        StoryBackend::Vertex {
            project_id,
            location,
        } => {
            let auth = auth_manager
                .clone()
                .context("Vertex AI backend requires credentials")?;
            tracing::info!(%project_id, %location, "Using Vertex AI for story generation");
            GeminiClient::vertex(project_id, location, auth, config.story_model)?
        }
        StoryBackend::ApiKey(api_key) => {
            tracing::info!("Using Gemini Developer API for story generation");
            GeminiClient::api_key(api_key, config.story_model)?
        }
    };
    let story_agent = StoryAgent::new(Arc::new(story_client));

    let image_agent = match auth_manager.filter(|_| config.images_requested()) {
        Some(auth) => match ImagenClient::new(
            config.project_id().unwrap_or_default().to_string(),
            config.location.clone(),
            auth,
            config.image_model.clone(),
        ) {
            Ok(client) => {
                tracing::info!(model = %config.image_model, "Imagen initialized");
                Some(ImageAgent::new(Arc::new(client)))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Imagen unavailable, running story-only");
                None
            }
        },
        None => {
            tracing::warn!("GOOGLE_CLOUD_PROJECT_ID not set, image generation disabled");
            None
        }
    };

    Ok(StoryWorkflow::new(story_agent, image_agent))
}
