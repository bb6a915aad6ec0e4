use std::str::FromStr;

use axum::extract::{Form, Path, State};
use axum::http::HeaderMap;
use axum::middleware::from_fn_with_state;
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use crate::db::DatabaseOperations;
use crate::middleware::{current_user, require_dev};
use crate::models::{AppState, CategoryForm, RoleForm};
use crate::render;
use crate::types::{AppError, AppResult, Role};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/dev", get(panel))
        .route("/dev/role", post(set_role))
        .route("/dev/category", post(create_category))
        .route("/dev/category/delete/{id}", post(delete_category))
        .route_layer(from_fn_with_state(state.clone(), require_dev))
        .with_state(state)
}

async fn panel(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Html<String>> {
    let users = DatabaseOperations::list_users(&state.pool).await?;
    let categories = DatabaseOperations::list_categories(&state.pool).await?;
    let tags = DatabaseOperations::list_tags(&state.pool).await?;
    let user = current_user(&state, &headers).await;

    let body = render::dev_body(&users, &categories, &tags);
    Ok(Html(render::layout("Dev", &categories, user.as_ref(), &body)))
}

async fn set_role(
    State(state): State<AppState>,
    claims: axum::Extension<crate::middleware::Claims>,
    Form(form): Form<RoleForm>,
) -> AppResult<Redirect> {
    let role = Role::from_str(&form.role)?;

    // A dev stripping their own dev role would lock the panel
    if form.user_id == claims.sub && !role.is_dev() {
        return Err(AppError::InvalidRequest(
            "cannot drop your own dev role".to_string(),
        ));
    }

    if DatabaseOperations::get_user(&state.pool, form.user_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!("user {}", form.user_id)));
    }

    DatabaseOperations::set_user_role(&state.pool, form.user_id, role).await?;
    info!(user_id = form.user_id, role = %role, "role changed");
    Ok(Redirect::to("/dev"))
}

async fn create_category(
    State(state): State<AppState>,
    Form(form): Form<CategoryForm>,
) -> AppResult<Redirect> {
    let name = form.name.trim().to_lowercase();
    if name.is_empty() {
        return Err(AppError::InvalidRequest("category name is required".to_string()));
    }

    let category = DatabaseOperations::create_category(&state.pool, &name).await?;
    info!(category_id = category.id, name = %category.name, "category created");
    Ok(Redirect::to("/dev"))
}

async fn delete_category(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Redirect> {
    if !DatabaseOperations::delete_category(&state.pool, id).await? {
        return Err(AppError::NotFound(format!("category {id}")));
    }
    info!(category_id = id, "category deleted");
    Ok(Redirect::to("/dev"))
}
