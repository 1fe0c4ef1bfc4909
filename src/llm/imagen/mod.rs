//! Imagen provider implementation
//!
//! Generates images with Imagen on Vertex AI, implementing the ImageProvider
//! trait.

pub mod client;
pub mod types;

pub use client::{ImagenClient, DEFAULT_IMAGEN_MODEL};
