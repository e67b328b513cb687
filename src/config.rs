// src/config.rs

use dotenvy::dotenv;
use std::env;

/// Lifetime of an issued bearer token when `JWT_EXPIRATION` is not set (2 hours).
pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 2 * 60 * 60;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://quiz.db?mode=rwc";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "quiz-backend".to_string());

        let jwt_audience = env::var("JWT_AUDIENCE").unwrap_or_else(|_| "quiz-client".to_string());

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Self {
            database_url,
            jwt_secret,
            jwt_issuer,
            jwt_audience,
            jwt_expiration,
            rust_log,
            bind_addr,
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        }
    }
}
