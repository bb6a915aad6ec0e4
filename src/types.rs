// Type definitions and enums

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

/// Site roles, lowest to highest privilege. Admins publish and delete
/// articles; devs additionally manage users and categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Dev,
}

impl Role {
    /// Roles allowed into the admin panel.
    pub fn can_publish(self) -> bool {
        matches!(self, Role::Admin | Role::Dev)
    }

    /// Roles allowed into the dev panel.
    pub fn is_dev(self) -> bool {
        matches!(self, Role::Dev)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
            Role::Dev => write!(f, "dev"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "dev" => Ok(Role::Dev),
            other => Err(AppError::InvalidRequest(format!("unknown role: {other}"))),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Document conversion error: {0}")]
    Docx(#[from] crate::docx::DocxError),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Docx(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }

        // Missing pages and articles share the site-styled 404
        if status == StatusCode::NOT_FOUND {
            return (status, Html(crate::render::not_found_page())).into_response();
        }

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_parsing_round_trips() {
        for role in [Role::User, Role::Admin, Role::Dev] {
            assert_eq!(Role::from_str(&role.to_string()).unwrap(), role);
        }
        assert!(Role::from_str("root").is_err());
    }

    #[test]
    fn privilege_ladder() {
        assert!(!Role::User.can_publish());
        assert!(Role::Admin.can_publish());
        assert!(Role::Dev.can_publish());
        assert!(Role::Dev.is_dev());
        assert!(!Role::Admin.is_dev());
    }
}
