use axum::extract::State;
use axum::response::Json as ResponseJson;
use axum::routing::get;
use axum::{Json, Router};

use crate::models::{AppState, HealthResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> ResponseJson<HealthResponse> {
    let database = match crate::db::health_check(&state.pool).await {
        Ok(_) => "connected".to_string(),
        Err(e) => format!("error: {e}"),
    };

    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        database,
    };

    Json(response)
}
