use sqlx::SqlitePool;

use crate::config::Config;
use crate::types::Role;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
}

// Database rows. FromRow is needed for runtime query_as (no DATABASE_URL
// required at compile time).

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: i64,
    pub title: String,
    /// Converter output stored verbatim; rendered inside the article page.
    pub content_html: String,
    pub creator_email: String,
    pub category_id: Option<i64>,
    pub date_created: chrono::NaiveDateTime,
}

impl Article {
    /// Display form of the creation date, dd.mm.yyyy.
    pub fn date_display(&self) -> String {
        self.date_created.format("%d.%m.%Y").to_string()
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

// Form payloads

#[derive(Debug, serde::Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct RoleForm {
    pub user_id: i64,
    pub role: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct CategoryForm {
    pub name: String,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
}
