use std::path::Path as FsPath;

use axum::extract::{Multipart, Path, State};
use axum::http::HeaderMap;
use axum::middleware::from_fn_with_state;
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::Router;
use tokio::fs;
use tracing::{info, warn};

use crate::db::DatabaseOperations;
use crate::docx::{load_docx, DocxConverter};
use crate::middleware::{current_user, require_publisher};
use crate::models::AppState;
use crate::render;
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/admin", get(panel))
        .route("/admin/upload", post(upload))
        .route("/admin/delete/{id}", post(delete))
        .route_layer(from_fn_with_state(state.clone(), require_publisher))
        .with_state(state)
}

async fn panel(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Html<String>> {
    let articles = DatabaseOperations::list_articles(&state.pool).await?;
    let categories = DatabaseOperations::list_categories(&state.pool).await?;
    let user = current_user(&state, &headers).await;

    let body = render::admin_body(&articles, &categories);
    Ok(Html(render::layout("Admin", &categories, user.as_ref(), &body)))
}

/// Collected multipart fields of the publish form.
#[derive(Default)]
struct UploadForm {
    title: String,
    category_id: Option<i64>,
    tags: Vec<String>,
    document: Option<Vec<u8>>,
}

async fn read_upload_form(mut multipart: Multipart) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("bad multipart payload: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "title" => {
                form.title = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidRequest(e.to_string()))?
                    .trim()
                    .to_string();
            }
            "category_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidRequest(e.to_string()))?;
                form.category_id = text.trim().parse::<i64>().ok();
            }
            "tags" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidRequest(e.to_string()))?;
                form.tags = text
                    .split(',')
                    .map(|t| t.trim().to_lowercase())
                    .filter(|t| !t.is_empty())
                    .collect();
            }
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidRequest(e.to_string()))?;
                form.document = Some(bytes.to_vec());
            }
            other => warn!(field = other, "ignoring unknown upload field"),
        }
    }

    Ok(form)
}

/// Publish an article from an uploaded Word document: parse, convert to
/// HTML, store the body in the database, and keep the full template
/// fragment on disk alongside.
async fn upload(
    State(state): State<AppState>,
    claims: axum::Extension<crate::middleware::Claims>,
    multipart: Multipart,
) -> AppResult<Redirect> {
    let form = read_upload_form(multipart).await?;

    if form.title.is_empty() {
        return Err(AppError::InvalidRequest("article title is required".to_string()));
    }
    let bytes = form
        .document
        .ok_or_else(|| AppError::InvalidRequest("a .docx file is required".to_string()))?;

    let document = load_docx(&bytes)?;
    let converter = DocxConverter::default();
    let content_html = converter.content_html(&document);
    let fragment = converter.convert(&document);

    let article = DatabaseOperations::create_article(
        &state.pool,
        &form.title,
        &content_html,
        &claims.email,
        form.category_id,
    )
    .await?;

    for tag_name in &form.tags {
        let tag = DatabaseOperations::ensure_tag(&state.pool, tag_name).await?;
        DatabaseOperations::tag_article(&state.pool, article.id, tag.id).await?;
    }

    // Authoring artifact, not served directly; the database copy is the
    // source of truth.
    let fragment_dir = FsPath::new(&state.config.upload.dir);
    if let Err(e) = fs::create_dir_all(fragment_dir).await {
        warn!(error = %e, "could not create fragment directory");
    } else {
        let path = fragment_dir.join(format!("{}.html", article.id));
        if let Err(e) = fs::write(&path, &fragment).await {
            warn!(error = %e, path = %path.display(), "could not write fragment");
        }
    }

    info!(
        article_id = article.id,
        paragraphs = document.paragraphs.len(),
        tags = form.tags.len(),
        "article published"
    );

    Ok(Redirect::to("/admin"))
}

async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Redirect> {
    if !DatabaseOperations::delete_article(&state.pool, id).await? {
        return Err(AppError::NotFound(format!("article {id}")));
    }
    info!(article_id = id, "article deleted");
    Ok(Redirect::to("/admin"))
}
