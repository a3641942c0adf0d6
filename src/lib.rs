// Doc Chat - chat with an LLM about uploaded documents

pub mod chat;
pub mod config;
pub mod extract;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod session;
pub mod types;

// Re-exports for convenience
pub use crate::config::Config;
pub use crate::models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
