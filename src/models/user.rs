// src/models/user.rs

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique (case-insensitive) email, also used as the user name.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub first_name: Option<String>,
    pub last_name: Option<String>,

    pub created_at: Option<chrono::NaiveDateTime>,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Email must be a valid email address."))]
    pub email: String,
    #[validate(custom(function = validate_password_policy))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub last_name: String,
}

/// DTO for user login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: u64,
}

pub const MIN_PASSWORD_LEN: usize = 6;

/// Password policy: at least six characters mixing a digit, a lowercase letter,
/// an uppercase letter and a non-alphanumeric character.
pub fn validate_password_policy(password: &str) -> Result<(), ValidationError> {
    let rule = |code: &'static str, message: &'static str| {
        ValidationError::new(code).with_message(Cow::Borrowed(message))
    };

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(rule(
            "password_too_short",
            "Passwords must be at least 6 characters.",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(rule(
            "password_requires_digit",
            "Passwords must have at least one digit ('0'-'9').",
        ));
    }
    if !password.chars().any(char::is_lowercase) {
        return Err(rule(
            "password_requires_lower",
            "Passwords must have at least one lowercase ('a'-'z').",
        ));
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(rule(
            "password_requires_upper",
            "Passwords must have at least one uppercase ('A'-'Z').",
        ));
    }
    if password.chars().all(char::is_alphanumeric) {
        return Err(rule(
            "password_requires_non_alphanumeric",
            "Passwords must have at least one non alphanumeric character.",
        ));
    }
    Ok(())
}
