// src/repositories/quiz_repository.rs

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, SqliteConnection, SqlitePool};

use crate::{
    error::AppError,
    models::quiz::{AnswerOption, Question, QuestionType, Quiz, QuizSummary},
};

/// Persistence of quiz definitions.
///
/// Implementations own id assignment: ids carried by the quiz handed to
/// `create_quiz` / `replace_quiz` (other than the quiz id for a replace) are ignored.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn list_quizzes(&self) -> Result<Vec<QuizSummary>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Quiz>, AppError>;

    /// Persists a new quiz and returns it with every id assigned.
    async fn create_quiz(&self, quiz: Quiz) -> Result<Quiz, AppError>;

    /// Overwrites title and description and recreates the whole question tree.
    /// Returns `false` when no quiz exists with `quiz.id`.
    async fn replace_quiz(&self, quiz: Quiz) -> Result<bool, AppError>;

    /// Returns `false` when no quiz exists with `id`.
    async fn delete_quiz(&self, id: i64) -> Result<bool, AppError>;
}

#[derive(FromRow)]
struct QuizRow {
    id: i64,
    title: String,
    description: String,
}

#[derive(FromRow)]
struct QuestionRow {
    id: i64,
    text: String,
    #[sqlx(rename = "type")]
    question_type: i64,
    points: i32,
}

#[derive(FromRow)]
struct OptionRow {
    id: i64,
    question_id: i64,
    text: String,
    is_correct: bool,
}

pub struct SqliteQuizRepository {
    pool: SqlitePool,
}

impl SqliteQuizRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Inserts the question tree of `quiz_id`, writing the new ids back into `questions`.
async fn insert_questions(
    conn: &mut SqliteConnection,
    quiz_id: i64,
    questions: &mut [Question],
) -> Result<(), sqlx::Error> {
    for (position, question) in questions.iter_mut().enumerate() {
        question.id = sqlx::query(
            "INSERT INTO questions (quiz_id, position, text, type, points) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(quiz_id)
        .bind(position as i64)
        .bind(&question.text)
        .bind(question.question_type.code())
        .bind(question.points)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();

        for (position, option) in question.options.iter_mut().enumerate() {
            option.id = sqlx::query(
                "INSERT INTO options (question_id, position, text, is_correct) VALUES (?, ?, ?, ?)",
            )
            .bind(question.id)
            .bind(position as i64)
            .bind(&option.text)
            .bind(option.is_correct)
            .execute(&mut *conn)
            .await?
            .last_insert_rowid();
        }
    }
    Ok(())
}

#[async_trait]
impl QuizRepository for SqliteQuizRepository {
    async fn list_quizzes(&self) -> Result<Vec<QuizSummary>, AppError> {
        let quizzes = sqlx::query_as::<_, QuizSummary>(
            r#"
            SELECT
                z.id AS quiz_id,
                z.title,
                z.description,
                COUNT(q.id) AS question_count
            FROM quizzes z
            LEFT JOIN questions q ON q.quiz_id = z.id
            GROUP BY z.id, z.title, z.description
            ORDER BY z.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list quizzes: {:?}", e);
            AppError::from(e)
        })?;

        Ok(quizzes)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Quiz>, AppError> {
        let Some(quiz) = sqlx::query_as::<_, QuizRow>(
            "SELECT id, title, description FROM quizzes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let question_rows = sqlx::query_as::<_, QuestionRow>(
            "SELECT id, text, type, points FROM questions WHERE quiz_id = ? ORDER BY position, id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let option_rows = sqlx::query_as::<_, OptionRow>(
            r#"
            SELECT o.id, o.question_id, o.text, o.is_correct
            FROM options o
            JOIN questions q ON o.question_id = q.id
            WHERE q.quiz_id = ?
            ORDER BY o.question_id, o.position, o.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let mut options_by_question: HashMap<i64, Vec<AnswerOption>> = HashMap::new();
        for row in option_rows {
            options_by_question
                .entry(row.question_id)
                .or_default()
                .push(AnswerOption {
                    id: row.id,
                    text: row.text,
                    is_correct: row.is_correct,
                });
        }

        let mut questions = Vec::with_capacity(question_rows.len());
        for row in question_rows {
            let question_type = QuestionType::try_from(row.question_type)
                .map_err(|e| AppError::InternalServerError(format!("question {}: {}", row.id, e)))?;
            questions.push(Question {
                id: row.id,
                text: row.text,
                question_type,
                points: row.points,
                options: options_by_question.remove(&row.id).unwrap_or_default(),
            });
        }

        Ok(Some(Quiz {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            questions,
        }))
    }

    async fn create_quiz(&self, mut quiz: Quiz) -> Result<Quiz, AppError> {
        let mut tx = self.pool.begin().await?;

        quiz.id = sqlx::query("INSERT INTO quizzes (title, description) VALUES (?, ?)")
            .bind(&quiz.title)
            .bind(&quiz.description)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        insert_questions(&mut *tx, quiz.id, &mut quiz.questions).await?;

        tx.commit().await?;

        tracing::info!(quiz_id = quiz.id, "Quiz created");
        Ok(quiz)
    }

    async fn replace_quiz(&self, mut quiz: Quiz) -> Result<bool, AppError> {
        // Delete and recreate run in one transaction so a failure
        // never leaves the quiz without its questions.
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE quizzes SET title = ?, description = ? WHERE id = ?")
            .bind(&quiz.title)
            .bind(&quiz.description)
            .bind(quiz.id)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            return Ok(false);
        }

        // Options go with their questions through ON DELETE CASCADE.
        sqlx::query("DELETE FROM questions WHERE quiz_id = ?")
            .bind(quiz.id)
            .execute(&mut *tx)
            .await?;

        insert_questions(&mut *tx, quiz.id, &mut quiz.questions).await?;

        tx.commit().await?;

        tracing::info!(quiz_id = quiz.id, "Quiz replaced");
        Ok(true)
    }

    async fn delete_quiz(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete quiz: {:?}", e);
                AppError::from(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
