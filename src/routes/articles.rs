use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tracing::info;

use crate::db::DatabaseOperations;
use crate::middleware::current_user;
use crate::models::AppState;
use crate::render;
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(overview))
        .route("/article/{id}", get(find_article))
        .route("/category/{id}", get(by_category))
        .with_state(state)
}

/// Front page: every article, newest first.
async fn overview(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Html<String>> {
    let articles = DatabaseOperations::list_articles(&state.pool).await?;
    let categories = DatabaseOperations::list_categories(&state.pool).await?;
    let user = current_user(&state, &headers).await;

    let body = render::overview_body("Articles", &articles);
    Ok(Html(render::layout("Articles", &categories, user.as_ref(), &body)))
}

/// Article page; 404 when there is no database row for the id.
async fn find_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> AppResult<Html<String>> {
    let article = DatabaseOperations::get_article(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("article {id}")))?;

    let creator = DatabaseOperations::get_user_by_email(&state.pool, &article.creator_email).await?;
    let categories = DatabaseOperations::list_categories(&state.pool).await?;
    let user = current_user(&state, &headers).await;

    info!(article_id = id, "serving article");

    let body = render::article_body(&article, creator.as_ref());
    Ok(Html(render::layout(
        &article.title,
        &categories,
        user.as_ref(),
        &body,
    )))
}

/// Articles filed under one nav category.
async fn by_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> AppResult<Html<String>> {
    let categories = DatabaseOperations::list_categories(&state.pool).await?;
    let category = categories
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))?;

    let articles = DatabaseOperations::list_articles_by_category(&state.pool, id).await?;
    let user = current_user(&state, &headers).await;

    let body = render::overview_body(&category.name, &articles);
    Ok(Html(render::layout(
        &category.name,
        &categories,
        user.as_ref(),
        &body,
    )))
}
