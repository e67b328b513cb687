// src/handlers/auth.rs

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{LoginRequest, RegisterRequest, TokenResponse, User},
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

const INVALID_LOGIN: &str = "Invalid login attempt.";

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it.
/// An already registered email (compared case-insensitively) is a 400, like any other validation error.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered"),
        (status = 400, description = "Validation errors")
    )
)]
pub async fn register(
    State(pool): State<SqlitePool>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let email = payload.email.trim();
    let already_taken = || AppError::BadRequest(format!("Email '{}' is already taken.", email));

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(&pool)
        .await?;
    if existing.is_some() {
        return Err(already_taken());
    }

    let hashed_password = hash_password(&payload.password)?;

    sqlx::query(
        r#"
        INSERT INTO users (email, password, first_name, last_name)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(email)
    .bind(hashed_password)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .execute(&pool)
    .await
    .map_err(|e| {
        // Lost a race with a concurrent registration of the same email.
        if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
            already_taken()
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    tracing::info!("Registered user {}", email);
    Ok(Json(json!({ "message": "User registered successfully" })))
}

/// Authenticates a user and returns a bearer token.
///
/// Unknown email and wrong password produce the same 401 response.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed bearer token", body = TokenResponse),
        (status = 401, description = "Invalid login attempt")
    )
)]
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password, first_name, last_name, created_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(payload.email.trim())
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let Some(user) = user else {
        tracing::info!("Login failed: unknown email");
        return Err(AppError::AuthError(INVALID_LOGIN.to_string()));
    };

    if !verify_password(&payload.password, &user.password)? {
        tracing::info!(user_id = user.id, "Login failed: wrong password");
        return Err(AppError::AuthError(INVALID_LOGIN.to_string()));
    }

    let token = sign_jwt(user.id, &user.email, &config)?;

    Ok(Json(TokenResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: config.jwt_expiration,
    }))
}
