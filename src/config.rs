//! Server configuration
//!
//! Every option can be given as a flag or through the environment. `.env` is
//! loaded before parsing, so values there behave like real environment
//! variables.

use clap::Parser;
use std::net::{IpAddr, SocketAddr};

use crate::llm::imagen::DEFAULT_IMAGEN_MODEL;
use crate::llm::GeminiModel;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No Gemini credentials: set GOOGLE_CLOUD_PROJECT_ID or GOOGLE_API_KEY")]
    MissingCredentials,

    #[error("Invalid CORS origin '{0}': expected an http(s) URL")]
    InvalidOrigin(String),
}

/// Where the story model is reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryBackend {
    Vertex { project_id: String, location: String },
    ApiKey(String),
}

/// StoryGen backend server
#[derive(Debug, Clone, Parser)]
#[command(name = "storygen", version, about, long_about = None)]
pub struct Config {
    /// Interface to bind.
    #[arg(long, env = "STORYGEN_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "STORYGEN_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Google Cloud project. Enables Vertex AI for stories and Imagen for keyframes.
    #[arg(long, env = "GOOGLE_CLOUD_PROJECT_ID")]
    pub project_id: Option<String>,

    /// Vertex AI region.
    #[arg(long, env = "GOOGLE_CLOUD_LOCATION", default_value = "us-central1")]
    pub location: String,

    /// Gemini Developer API key, used when no project is set.
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Text model for story generation.
    #[arg(long, env = "STORYGEN_STORY_MODEL", default_value_t = GeminiModel::default())]
    pub story_model: GeminiModel,

    /// Imagen model for keyframes.
    #[arg(long, env = "STORYGEN_IMAGE_MODEL", default_value = DEFAULT_IMAGEN_MODEL)]
    pub image_model: String,

    /// Origins allowed by CORS, comma separated.
    #[arg(
        long,
        env = "STORYGEN_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_values = ["http://localhost:3000", "http://127.0.0.1:3000"]
    )]
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Project id, if set to something other than whitespace
    pub fn project_id(&self) -> Option<&str> {
        non_blank(self.project_id.as_deref())
    }

    /// Image generation is only attempted with a Vertex project
    pub fn images_requested(&self) -> bool {
        self.project_id().is_some()
    }

    /// Pick the story backend: a project selects Vertex AI, otherwise an API
    /// key selects the Gemini Developer API
    pub fn story_backend(&self) -> Result<StoryBackend, ConfigError> {
        if let Some(project_id) = self.project_id() {
            return Ok(StoryBackend::Vertex {
                project_id: project_id.to_string(),
                location: self.location.clone(),
            });
        }
        non_blank(self.api_key.as_deref())
            .map(|key| StoryBackend::ApiKey(key.to_string()))
            .ok_or(ConfigError::MissingCredentials)
    }

    /// Trimmed, non-empty CORS origins
    pub fn cors_origins(&self) -> Result<Vec<String>, ConfigError> {
        self.allowed_origins
            .iter()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                if origin.starts_with("http://") || origin.starts_with("https://") {
                    Ok(origin.trim_end_matches('/').to_string())
                } else {
                    Err(ConfigError::InvalidOrigin(origin.to_string()))
                }
            })
            .collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["storygen"];
        argv.extend_from_slice(args);
        let mut config = Config::try_parse_from(argv).unwrap();
        // Ignore credentials from the test environment unless given as flags
        if !args.contains(&"--project-id") {
            config.project_id = None;
        }
        if !args.contains(&"--api-key") {
            config.api_key = None;
        }
        config
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.location, "us-central1");
        assert_eq!(config.image_model, "imagegeneration@006");
        assert!(!config.images_requested());
    }

    #[test]
    fn test_socket_addr() {
        let config = parse(&["--host", "127.0.0.1", "--port", "9000"]);
        assert_eq!(config.socket_addr(), "127.0.0.1:9000".parse().unwrap());
    }

    #[test]
    fn test_project_selects_vertex() {
        let config = parse(&["--project-id", "my-proj", "--api-key", "k", "--location", "europe-west4"]);
        assert_eq!(
            config.story_backend().unwrap(),
            StoryBackend::Vertex {
                project_id: "my-proj".to_string(),
                location: "europe-west4".to_string()
            }
        );
        assert!(config.images_requested());
    }

    #[test]
    fn test_api_key_without_project() {
        let config = parse(&["--api-key", "secret"]);
        assert_eq!(
            config.story_backend().unwrap(),
            StoryBackend::ApiKey("secret".to_string())
        );
        assert!(!config.images_requested());
    }

    #[test]
    fn test_blank_credentials_are_missing() {
        let config = parse(&["--project-id", " ", "--api-key", ""]);
        assert!(matches!(
            config.story_backend(),
            Err(ConfigError::MissingCredentials)
        ));
    }

    #[test]
    fn test_story_model_parsing() {
        let config = parse(&["--story-model", "gemini-2.5-pro"]);
        assert_eq!(config.story_model, GeminiModel::Gemini25Pro);
        assert!(Config::try_parse_from(["storygen", "--story-model", "gpt-4"]).is_err());
    }

    #[test]
    fn test_cors_origins() {
        let config = parse(&["--allowed-origins", "https://app.example.com/, http://localhost:5173"]);
        assert_eq!(
            config.cors_origins().unwrap(),
            vec!["https://app.example.com", "http://localhost:5173"]
        );

        let config = parse(&["--allowed-origins", "localhost:3000"]);
        assert!(matches!(config.cors_origins(), Err(ConfigError::InvalidOrigin(_))));
    }
}
