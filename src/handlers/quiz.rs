// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::quiz::{Quiz, QuizDto, QuizSummary},
    repositories::QuizRepository,
};

fn quiz_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Quiz {} not found", id))
}

/// Lists every quiz as a summary (no questions, only their count).
#[utoipa::path(
    get,
    path = "/quizzes",
    tag = "quizzes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Quiz summaries", body = [QuizSummary]),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_quizzes(
    State(repo): State<Arc<dyn QuizRepository>>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("Fetching all quizzes");
    let quizzes = repo.list_quizzes().await?;
    Ok(Json(quizzes))
}

/// Retrieves a single quiz with its full answer key.
#[utoipa::path(
    get,
    path = "/quizzes/{id}",
    tag = "quizzes",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Quiz id")),
    responses(
        (status = 200, description = "Full quiz", body = QuizDto),
        (status = 404, description = "No quiz with this id")
    )
)]
pub async fn get_quiz(
    State(repo): State<Arc<dyn QuizRepository>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = repo.find_by_id(id).await?.ok_or_else(|| {
        tracing::warn!(quiz_id = id, "Quiz not found");
        quiz_not_found(id)
    })?;

    Ok(Json(QuizDto::from(quiz)))
}

/// Creates a quiz from a draft.
///
/// Title and description lengths are validated before anything is written.
/// Returns 201 with the stored quiz and a `Location` header.
#[utoipa::path(
    post,
    path = "/quizzes",
    tag = "quizzes",
    security(("bearer_auth" = [])),
    request_body = QuizDto,
    responses(
        (status = 201, description = "Quiz created", body = QuizDto),
        (status = 400, description = "Validation or mapping failure")
    )
)]
pub async fn create_quiz(
    State(repo): State<Arc<dyn QuizRepository>>,
    payload: Result<Json<QuizDto>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(draft) = payload?;

    if let Err(validation_errors) = draft.validate() {
        tracing::warn!("Quiz creation rejected: {}", validation_errors);
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let created = repo.create_quiz(Quiz::from(draft)).await?;
    let location = format!("/quizzes/{}", created.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(QuizDto::from(created)),
    ))
}

/// Replaces a quiz: title, description and the whole question tree.
///
/// * 400 when the path id and `quizId` disagree (checked before any storage access).
/// * 404 when no quiz exists at `id`.
#[utoipa::path(
    put,
    path = "/quizzes/{id}",
    tag = "quizzes",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Quiz id")),
    request_body = QuizDto,
    responses(
        (status = 204, description = "Quiz updated"),
        (status = 400, description = "Id mismatch or validation failure"),
        (status = 404, description = "No quiz with this id")
    )
)]
pub async fn update_quiz(
    State(repo): State<Arc<dyn QuizRepository>>,
    Path(id): Path<i64>,
    payload: Result<Json<QuizDto>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(draft) = payload?;

    if draft.quiz_id != id {
        return Err(AppError::BadRequest(format!(
            "Quiz id {} in the body does not match id {} in the path",
            draft.quiz_id, id
        )));
    }

    if let Err(validation_errors) = draft.validate() {
        tracing::warn!(quiz_id = id, "Quiz update rejected: {}", validation_errors);
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if !repo.replace_quiz(Quiz::from(draft)).await? {
        tracing::warn!(quiz_id = id, "Quiz not found when updating");
        return Err(quiz_not_found(id));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Deletes a quiz and everything it owns.
#[utoipa::path(
    delete,
    path = "/quizzes/{id}",
    tag = "quizzes",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Quiz id")),
    responses(
        (status = 204, description = "Quiz deleted"),
        (status = 404, description = "No quiz with this id")
    )
)]
pub async fn delete_quiz(
    State(repo): State<Arc<dyn QuizRepository>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !repo.delete_quiz(id).await? {
        tracing::warn!(quiz_id = id, "Quiz not found when deleting");
        return Err(quiz_not_found(id));
    }

    tracing::info!(quiz_id = id, "Quiz deleted");
    Ok(StatusCode::NO_CONTENT)
}
