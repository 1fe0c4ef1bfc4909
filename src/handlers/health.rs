// GET /health and GET / handlers

use crate::models::{HealthResponse, RootResponse};
use crate::workflow::StoryWorkflow;
use std::convert::Infallible;
use std::sync::Arc;

pub const SERVICE_NAME: &str = "storygen-backend";

pub fn health_status() -> HealthResponse {
    HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    }
}

pub fn service_info(image_generation: bool) -> RootResponse {
    RootResponse {
        message: "StoryGen Backend API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        workflow: "sequential".to_string(),
        image_generation,
    }
}

pub async fn health_handler() -> Result<impl warp::Reply, Infallible> {
    Ok(warp::reply::json(&health_status()))
}

pub async fn root_handler(workflow: Arc<StoryWorkflow>) -> Result<impl warp::Reply, Infallible> {
    Ok(warp::reply::json(&service_info(workflow.images_enabled())))
}
