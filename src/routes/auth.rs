use axum::extract::{Form, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use tracing::info;

use crate::db::DatabaseOperations;
use crate::middleware::{
    clear_session_cookie, current_user, hash_password, issue_token, session_cookie,
    verify_password,
};
use crate::models::{AppState, LoginForm, SignupForm};
use crate::render;
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/signup", get(signup_page).post(signup))
        .route("/logout", get(logout))
        .with_state(state)
}

async fn login_page(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Html<String>> {
    let categories = DatabaseOperations::list_categories(&state.pool).await?;
    let user = current_user(&state, &headers).await;
    Ok(Html(render::layout(
        "Log in",
        &categories,
        user.as_ref(),
        &render::login_body(None),
    )))
}

async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let user = DatabaseOperations::get_user_by_email(&state.pool, &form.email).await?;

    let Some(user) = user.filter(|u| verify_password(&form.password, &u.password_hash)) else {
        let categories = DatabaseOperations::list_categories(&state.pool).await?;
        let body = render::login_body(Some("Wrong email or password."));
        return Ok(Html(render::layout("Log in", &categories, None, &body)).into_response());
    };

    info!(user_id = user.id, "user logged in");

    let token = issue_token(&user, &state.config.auth)?;
    Ok(with_cookie(
        Redirect::to("/"),
        &session_cookie(&token, state.config.auth.session_ttl),
    )?)
}

async fn signup_page(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Html<String>> {
    let categories = DatabaseOperations::list_categories(&state.pool).await?;
    let user = current_user(&state, &headers).await;
    Ok(Html(render::layout(
        "Sign up",
        &categories,
        user.as_ref(),
        &render::signup_body(None),
    )))
}

async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> AppResult<Response> {
    if form.username.trim().is_empty() || form.email.trim().is_empty() {
        return Err(AppError::InvalidRequest("username and email are required".to_string()));
    }
    if form.password.len() < 8 {
        let categories = DatabaseOperations::list_categories(&state.pool).await?;
        let body = render::signup_body(Some("Password must be at least 8 characters."));
        return Ok(Html(render::layout("Sign up", &categories, None, &body)).into_response());
    }

    if DatabaseOperations::get_user_by_email(&state.pool, &form.email)
        .await?
        .is_some()
    {
        let categories = DatabaseOperations::list_categories(&state.pool).await?;
        let body = render::signup_body(Some("An account with this email already exists."));
        return Ok(Html(render::layout("Sign up", &categories, None, &body)).into_response());
    }

    let password_hash = hash_password(&form.password)?;
    let user = DatabaseOperations::create_user(
        &state.pool,
        form.username.trim(),
        form.email.trim(),
        &password_hash,
    )
    .await?;

    info!(user_id = user.id, "user signed up");

    let token = issue_token(&user, &state.config.auth)?;
    Ok(with_cookie(
        Redirect::to("/"),
        &session_cookie(&token, state.config.auth.session_ttl),
    )?)
}

async fn logout() -> AppResult<Response> {
    Ok(with_cookie(Redirect::to("/"), &clear_session_cookie())?)
}

fn with_cookie(redirect: Redirect, cookie: &str) -> AppResult<Response> {
    let mut response = redirect.into_response();
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| AppError::Internal(format!("invalid cookie value: {e}")))?;
    response.headers_mut().insert(SET_COOKIE, value);
    Ok(response)
}
