use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Html;
use axum::routing::get;
use axum::Router;

use crate::db::DatabaseOperations;
use crate::middleware::current_user;
use crate::models::AppState;
use crate::render;
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/tags/{name}", get(by_tag))
        .with_state(state)
}

/// Every article carrying the tag. An unknown tag is just an empty
/// listing, not an error.
async fn by_tag(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> AppResult<Html<String>> {
    let articles = DatabaseOperations::list_articles_by_tag(&state.pool, &name).await?;
    let categories = DatabaseOperations::list_categories(&state.pool).await?;
    let user = current_user(&state, &headers).await;

    let heading = format!("Tagged: {name}");
    let body = render::overview_body(&heading, &articles);
    Ok(Html(render::layout(&heading, &categories, user.as_ref(), &body)))
}
