pub mod chat;
pub mod health;

pub use chat::{forward_handler, missing_project_handler};
pub use health::health_handler;
