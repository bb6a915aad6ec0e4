use anyhow::Result;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for session tokens. Generated per process when unset,
    /// which invalidates sessions across restarts.
    pub secret: String,
    /// Session lifetime in seconds.
    pub session_ttl: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Directory where generated article fragments are written.
    pub dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite://pressroom.db".to_string()),
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
            },
            auth: AuthConfig {
                secret: env::var("PRESSROOM_SECRET").unwrap_or_else(|_| generate_secret(64)),
                session_ttl: env::var("SESSION_TTL")
                    .unwrap_or_else(|_| "86400".to_string())
                    .parse()?,
            },
            upload: UploadConfig {
                dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "html_pages".to_string()),
            },
        })
    }
}

/// Random alphanumeric key used when no secret is configured.
pub fn generate_secret(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
