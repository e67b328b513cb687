// src/seed.rs

use sqlx::SqlitePool;

use crate::{
    config::Config,
    error::AppError,
    models::quiz::{AnswerOption, Question, QuestionType, Quiz},
    repositories::QuizRepository,
    utils::hash::hash_password,
};

fn option(text: &str, is_correct: bool) -> AnswerOption {
    AnswerOption {
        text: text.to_string(),
        is_correct,
        ..AnswerOption::default()
    }
}

/// The quiz a fresh installation starts with.
pub fn sample_quiz() -> Quiz {
    Quiz {
        id: 0,
        title: "General Knowledge".to_string(),
        description: "A sample quiz to test your smarts.".to_string(),
        questions: vec![
            Question {
                text: "What is the capital of France?".to_string(),
                question_type: QuestionType::SingleChoice,
                options: vec![
                    option("Berlin", false),
                    option("Madrid", false),
                    option("Paris", true),
                    option("Rome", false),
                ],
                ..Question::default()
            },
            Question {
                text: "Which of these are fruits?".to_string(),
                question_type: QuestionType::MultipleChoice,
                options: vec![
                    option("Apple", true),
                    option("Carrot", false),
                    option("Banana", true),
                    option("Potato", false),
                ],
                ..Question::default()
            },
            Question {
                text: "What is 2 + 2?".to_string(),
                question_type: QuestionType::Text,
                options: vec![option("4", true)],
                ..Question::default()
            },
        ],
    }
}

/// Stores the sample quiz when no quiz exists yet.
pub async fn seed_sample_quiz(pool: &SqlitePool, repo: &dyn QuizRepository) -> Result<(), AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quizzes")
        .fetch_one(pool)
        .await?;

    if count == 0 {
        let quiz = repo.create_quiz(sample_quiz()).await?;
        tracing::info!(quiz_id = quiz.id, "Seeded sample quiz");
    }
    Ok(())
}

/// Creates the admin account from `ADMIN_EMAIL` / `ADMIN_PASSWORD` if both are set.
pub async fn seed_admin_user(pool: &SqlitePool, config: &Config) -> Result<(), AppError> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    if existing.is_none() {
        tracing::info!("Seeding admin user: {}", email);
        let hashed_password = hash_password(password)?;

        sqlx::query(
            "INSERT INTO users (email, password, first_name, last_name) VALUES (?, ?, 'Admin', 'User')",
        )
        .bind(email)
        .bind(hashed_password)
        .execute(pool)
        .await?;
        tracing::info!("Admin user created successfully.");
    }
    Ok(())
}
