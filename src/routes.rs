// Route definitions

use crate::handlers;
use crate::workflow::StoryWorkflow;
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;

pub fn configure_routes(
    workflow: Arc<StoryWorkflow>,
    allowed_origins: &[String],
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // GET /health
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::health_handler);

    // GET /
    let root = warp::path::end()
        .and(warp::get())
        .and(with_workflow(workflow.clone()))
        .and_then(handlers::root_handler);

    // GET /ws/{userId}
    let ws = warp::path("ws")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::ws())
        .and(with_workflow(workflow))
        .and_then(handlers::ws_handler);

    let cors = warp::cors()
        .allow_origins(allowed_origins.iter().map(String::as_str))
        .allow_credentials(true)
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_headers(vec!["content-type", "authorization"]);

    health.or(root).or(ws).with(cors)
}

fn with_workflow(
    workflow: Arc<StoryWorkflow>,
) -> impl Filter<Extract = (Arc<StoryWorkflow>,), Error = Infallible> + Clone {
    warp::any().map(move || workflow.clone())
}
