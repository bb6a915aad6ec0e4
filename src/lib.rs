// Pressroom - a small article CMS with DOCX-to-HTML publishing

pub mod config;
pub mod db;
pub mod docx;
pub mod middleware;
pub mod models;
pub mod render;
pub mod routes;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use docx::{DocxConverter, StyleDefaults};
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
