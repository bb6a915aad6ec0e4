// Session authentication: argon2 password hashes, JWT session tokens
// carried in an HttpOnly cookie, and role gates for the panels.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::{Request, State};
use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};

use crate::config::AuthConfig;
use crate::db::DatabaseOperations;
use crate::models::{AppState, User};
use crate::types::{AppError, AppResult, Role};

pub const SESSION_COOKIE: &str = "pressroom_session";

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    pub email: String,
    pub role: Role,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

pub fn issue_token(user: &User, auth: &AuthConfig) -> AppResult<String> {
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        exp: chrono::Utc::now().timestamp() + auth.session_ttl,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("token encoding failed: {e}")))
}

pub fn decode_token(token: &str, secret: &str) -> AppResult<Claims> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Auth(format!("invalid session token: {e}")))
}

/// Cookie value for a fresh session.
pub fn session_cookie(token: &str, ttl: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl}")
}

/// Cookie value that clears the session.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Claims from the request's session cookie, if present and valid.
pub fn session_claims(headers: &HeaderMap, secret: &str) -> Option<Claims> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;
    let token = cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })?;
    decode_token(token, secret).ok()
}

/// Load the logged-in user, if any. Pages use this to fill the nav bar;
/// a stale or tampered cookie reads as logged out.
pub async fn current_user(state: &AppState, headers: &HeaderMap) -> Option<User> {
    let claims = session_claims(headers, &state.config.auth.secret)?;
    DatabaseOperations::get_user(&state.pool, claims.sub)
        .await
        .ok()
        .flatten()
}

/// Gate for the admin panel: admins and devs pass. The verified claims
/// are attached for the handlers.
pub async fn require_publisher(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = session_claims(req.headers(), &state.config.auth.secret)
        .ok_or_else(|| AppError::Auth("login required".to_string()))?;

    if !claims.role.can_publish() {
        return Err(AppError::Auth("admin access required".to_string()));
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Gate for the dev panel: devs only.
pub async fn require_dev(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = session_claims(req.headers(), &state.config.auth.secret)
        .ok_or_else(|| AppError::Auth("login required".to_string()))?;

    if !claims.role.is_dev() {
        return Err(AppError::Auth("dev access required".to_string()));
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
