//! HTTP routes
//!
//! This module organizes all endpoints of the site:
//! - `/` and `/article/{id}` - public article pages
//! - `/category/{id}` and `/tags/{name}` - filtered listings
//! - `/login`, `/signup`, `/logout` - session management
//! - `/admin/*` - publishing panel (admin/dev roles)
//! - `/dev/*` - user and category administration (dev role)
//! - `/api/health` - health probe

pub mod admin;
pub mod articles;
pub mod auth;
pub mod dev;
pub mod health;
pub mod tags;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::models::AppState;

/// Create the main application router.
///
/// Each sub-router carries its own copy of the shared state; the
/// role-gated panels attach their guards before merging.
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    Router::new()
        .merge(articles::router(state.clone()))
        .merge(tags::router(state.clone()))
        .merge(auth::router(state.clone()))
        .merge(admin::router(state.clone()))
        .merge(dev::router(state.clone()))
        .merge(health::router(state))
        .layer(TraceLayer::new_for_http())
}
