// tests/common/mod.rs

#![allow(dead_code)]

use std::time::Duration;

use quiz_backend::{config::Config, routes, state::AppState};
use serde_json::{Value, json};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

pub const TEST_PASSWORD: &str = "Passw0rd!";

pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
    pub config: Config,
    pub client: reqwest::Client,
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_issuer: "quiz-backend-test".to_string(),
        jwt_audience: "quiz-client-test".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        admin_email: None,
        admin_password: None,
    }
}

/// Spawns the app on a random port, backed by a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    let config = test_config();

    // A single connection that never expires keeps the in-memory database alive.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect(&config.database_url)
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let state = AppState::new(pool.clone(), config.clone());
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        pool,
        config,
        client: reqwest::Client::new(),
    }
}

pub fn unique_email() -> String {
    format!("u_{}@example.com", &uuid::Uuid::new_v4().to_string()[..8])
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/auth/register"))
            .json(&json!({
                "email": email,
                "password": password,
                "firstName": "Test",
                "lastName": "User"
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Registers a fresh user and returns a bearer token for it.
    pub async fn token(&self) -> String {
        let email = unique_email();
        let registered = self.register(&email, TEST_PASSWORD).await;
        assert_eq!(registered.status().as_u16(), 200);

        let body: Value = self.login(&email, TEST_PASSWORD).await.json().await.unwrap();
        body["token"].as_str().expect("Token not found").to_string()
    }

    pub async fn create_quiz(&self, token: &str, quiz: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/quizzes"))
            .bearer_auth(token)
            .json(quiz)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_quiz(&self, token: &str, id: i64) -> reqwest::Response {
        self.client
            .get(self.url(&format!("/quizzes/{}", id)))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn quiz_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM quizzes")
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

/// Three one-point questions: capital of France, fruits, 2 + 2.
pub fn sample_quiz_json() -> Value {
    json!({
        "title": "General Knowledge",
        "description": "A sample quiz to test your smarts.",
        "questions": [
            {
                "text": "What is the capital of France?",
                "type": 0,
                "points": 1,
                "options": [
                    { "text": "Berlin", "isCorrect": false },
                    { "text": "Madrid", "isCorrect": false },
                    { "text": "Paris", "isCorrect": true },
                    { "text": "Rome", "isCorrect": false }
                ]
            },
            {
                "text": "Which of these are fruits?",
                "type": 1,
                "points": 1,
                "options": [
                    { "text": "Apple", "isCorrect": true },
                    { "text": "Carrot", "isCorrect": false },
                    { "text": "Banana", "isCorrect": true },
                    { "text": "Potato", "isCorrect": false }
                ]
            },
            {
                "text": "What is 2 + 2?",
                "type": 2,
                "options": [ { "text": "4", "isCorrect": true } ]
            }
        ]
    })
}
