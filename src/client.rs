// src/client.rs

//! HTTP client for the quiz and auth endpoints.
//!
//! Quizzes come back as domain `Quiz` values with their answer keys, ready for
//! `scoring::score_quiz`. Nothing about an attempt is ever sent to the server.

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::models::{
    quiz::{AnswerKeyError, Quiz, QuizDto, QuizSummary},
    user::{LoginRequest, RegisterRequest, TokenResponse},
};

/// Shown when the server gives no readable reason.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server rejected the request; `message` is its error text.
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("not signed in")]
    NotSignedIn,

    #[error(transparent)]
    AnswerKey(#[from] AnswerKeyError),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Turns a non-success response into `ClientError::Api`, keeping the server's message.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) if !text.trim().is_empty() => text,
        Err(_) => GENERIC_FAILURE.to_string(),
    };
    Err(ClientError::Api { status, message })
}

#[derive(Debug, Clone)]
pub struct QuizClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl QuizClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self) -> Result<String, ClientError> {
        self.token
            .as_deref()
            .map(|t| format!("Bearer {}", t))
            .ok_or(ClientError::NotSignedIn)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(request)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Logs in and keeps the returned token for later calls.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let body: TokenResponse = check(response).await?.json().await?;
        self.token = Some(body.token.clone());
        Ok(body.token)
    }

    pub async fn list_quizzes(&self) -> Result<Vec<QuizSummary>, ClientError> {
        let response = self
            .http
            .get(self.url("/quizzes"))
            .header(reqwest::header::AUTHORIZATION, self.bearer()?)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn get_quiz(&self, id: i64) -> Result<Quiz, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/quizzes/{}", id)))
            .header(reqwest::header::AUTHORIZATION, self.bearer()?)
            .send()
            .await?;
        let dto: QuizDto = check(response).await?.json().await?;
        Ok(Quiz::from(dto))
    }

    /// Saves a new quiz after the editor's answer-key check.
    pub async fn create_quiz(&self, quiz: &Quiz) -> Result<Quiz, ClientError> {
        quiz.check_answer_key()?;
        let response = self
            .http
            .post(self.url("/quizzes"))
            .header(reqwest::header::AUTHORIZATION, self.bearer()?)
            .json(&QuizDto::from(quiz.clone()))
            .send()
            .await?;
        let dto: QuizDto = check(response).await?.json().await?;
        Ok(Quiz::from(dto))
    }

    /// Replaces an existing quiz after the editor's answer-key check.
    pub async fn update_quiz(&self, quiz: &Quiz) -> Result<(), ClientError> {
        quiz.check_answer_key()?;
        let response = self
            .http
            .put(self.url(&format!("/quizzes/{}", quiz.id)))
            .header(reqwest::header::AUTHORIZATION, self.bearer()?)
            .json(&QuizDto::from(quiz.clone()))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    pub async fn delete_quiz(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/quizzes/{}", id)))
            .header(reqwest::header::AUTHORIZATION, self.bearer()?)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}
