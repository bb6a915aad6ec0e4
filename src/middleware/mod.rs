// Middleware for session authentication and role gates

pub mod auth;

pub use auth::*;
