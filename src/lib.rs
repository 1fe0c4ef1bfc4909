// HTTP and WebSocket server modules
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;

// Story-to-image workflow
pub mod workflow;

// LLM abstraction layer
pub mod llm;
