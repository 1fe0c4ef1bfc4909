//! Application Default Credentials (ADC) wrapper

use gcp_auth::AuthenticationManager as GcpAuthManager;

use crate::llm::core::error::LlmError;

/// OAuth scope covering Vertex AI text and image endpoints
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Manages GCP access tokens for the Vertex AI clients
///
/// One instance is shared by the Gemini and Imagen clients; `gcp_auth`
/// caches the token and refreshes it when it expires.
///
/// Credential sources, in discovery order:
/// - `GOOGLE_APPLICATION_CREDENTIALS` environment variable
/// - User credentials from `gcloud auth application-default login`
/// - Metadata server (Compute Engine, Cloud Run, GKE)
pub struct AuthenticationManager {
    inner: GcpAuthManager,
}

impl AuthenticationManager {
    /// Discover credentials using the standard ADC flow.
    ///
    /// # Errors
    /// Returns an error if no valid credentials can be found.
    pub async fn new() -> Result<Self, LlmError> {
        let inner = GcpAuthManager::new().await.map_err(|e| {
            LlmError::AuthenticationError(format!("Failed to initialize ADC: {}", e))
        })?;

        Ok(Self { inner })
    }

    /// Get a bearer token for the cloud platform scope
    pub async fn get_token(&self) -> Result<String, LlmError> {
        let token = self
            .inner
            .get_token(&[CLOUD_PLATFORM_SCOPE])
            .await
            .map_err(|e| LlmError::AuthenticationError(format!("Failed to get token: {}", e)))?;

        Ok(token.as_str().to_string())
    }
}
