// Handlers module

pub mod health;
pub mod websocket;

pub use health::{health_handler, root_handler};
pub use websocket::ws_handler;
