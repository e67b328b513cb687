// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

/// How a question is answered and graded.
/// Travels on the wire as a small integer: 0, 1 or 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum QuestionType {
    /// One option may be picked; exactly one option is correct.
    #[default]
    SingleChoice,
    /// Any number of options may be picked; the picked set must equal the correct set.
    MultipleChoice,
    /// Free text compared against the question's single option.
    Text,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown question type {0}, expected 0 (single choice), 1 (multiple choice) or 2 (text)")]
pub struct UnknownQuestionType(pub i64);

impl QuestionType {
    pub fn code(self) -> i64 {
        match self {
            QuestionType::SingleChoice => 0,
            QuestionType::MultipleChoice => 1,
            QuestionType::Text => 2,
        }
    }
}

impl From<QuestionType> for i64 {
    fn from(question_type: QuestionType) -> Self {
        question_type.code()
    }
}

impl TryFrom<i64> for QuestionType {
    type Error = UnknownQuestionType;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(QuestionType::SingleChoice),
            1 => Ok(QuestionType::MultipleChoice),
            2 => Ok(QuestionType::Text),
            other => Err(UnknownQuestionType(other)),
        }
    }
}

/// A quiz together with its full answer key.
/// Owns its questions, which own their options; there are no back-references.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Quiz {
    /// Assigned by the store; 0 until persisted.
    pub id: i64,
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub question_type: QuestionType,
    pub points: i32,
    pub options: Vec<AnswerOption>,
}

/// One selectable choice. For a `Text` question the single option holds the accepted answer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnswerOption {
    pub id: i64,
    pub text: String,
    pub is_correct: bool,
}

impl Default for Question {
    fn default() -> Self {
        Self {
            id: 0,
            text: String::new(),
            question_type: QuestionType::default(),
            points: default_points(),
            options: Vec::new(),
        }
    }
}

fn default_points() -> i32 {
    1
}

/// Upper bound the API accepts for a single question's points.
pub const MAX_POINTS: i32 = 1000;

impl Question {
    /// Points awarded when answered correctly. Unset (non-positive) counts as 1.
    pub fn effective_points(&self) -> i32 {
        if self.points > 0 { self.points } else { 1 }
    }

    pub fn correct_option_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.options.iter().filter(|o| o.is_correct).map(|o| o.id)
    }

    /// The accepted answer of a `Text` question, or "" when the key is missing.
    pub fn accepted_text(&self) -> &str {
        self.options.first().map(|o| o.text.as_str()).unwrap_or("")
    }

    /// Switches the question type the way the editor does: a text question
    /// always gets a single fresh option acting as the accepted answer.
    pub fn set_type(&mut self, question_type: QuestionType) {
        self.question_type = question_type;
        if question_type == QuestionType::Text {
            self.options = vec![AnswerOption {
                is_correct: true,
                ..AnswerOption::default()
            }];
        }
    }

    pub fn add_option(&mut self, text: impl Into<String>) {
        self.options.push(AnswerOption {
            text: text.into(),
            ..AnswerOption::default()
        });
    }

    /// Flags the option at `index`. Marking a single-choice option correct
    /// clears every other flag so only one can be set.
    pub fn mark_correct(&mut self, index: usize, correct: bool) {
        if index >= self.options.len() {
            return;
        }
        if correct && self.question_type == QuestionType::SingleChoice {
            for option in &mut self.options {
                option.is_correct = false;
            }
        }
        self.options[index].is_correct = correct;
    }
}

/// Answer-key problems the editor refuses to save. Questions are numbered from 1.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnswerKeyError {
    #[error("Question {0} must have at least one correct answer selected.")]
    NoCorrectAnswer(usize),
    #[error("Question {0} must have exactly one correct answer selected.")]
    TooManyCorrectAnswers(usize),
    #[error("Question {0} must have exactly one accepted answer.")]
    TextAnswerCount(usize),
}

impl Quiz {
    /// Editor-side answer key check. The server stores whatever it is given.
    pub fn check_answer_key(&self) -> Result<(), AnswerKeyError> {
        for (index, question) in self.questions.iter().enumerate() {
            let number = index + 1;
            let correct = question.correct_option_ids().count();
            match question.question_type {
                QuestionType::SingleChoice if correct == 0 => {
                    return Err(AnswerKeyError::NoCorrectAnswer(number));
                }
                QuestionType::SingleChoice if correct > 1 => {
                    return Err(AnswerKeyError::TooManyCorrectAnswers(number));
                }
                QuestionType::MultipleChoice if correct == 0 => {
                    return Err(AnswerKeyError::NoCorrectAnswer(number));
                }
                QuestionType::Text
                    if question.options.len() != 1 || question.accepted_text().trim().is_empty() =>
                {
                    return Err(AnswerKeyError::TextAnswerCount(number));
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn points_possible(&self) -> i64 {
        self.questions
            .iter()
            .map(|q| i64::from(q.effective_points()))
            .sum()
    }
}

/// Wire shape of a full quiz, used for GET, POST and PUT bodies.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizDto {
    #[serde(default)]
    pub quiz_id: i64,
    #[validate(length(
        min = 3,
        max = 100,
        message = "Title length must be between 3 and 100 characters."
    ))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters."))]
    pub description: String,
    #[serde(default)]
    #[validate(nested)]
    pub questions: Vec<QuestionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    #[serde(default)]
    pub question_id: i64,
    #[validate(length(min = 1, message = "Question text is required."))]
    pub text: String,
    /// 0 = single choice, 1 = multiple choice, 2 = text.
    #[serde(rename = "type", default)]
    #[schema(value_type = u8)]
    pub question_type: QuestionType,
    #[serde(default = "default_points")]
    #[validate(range(
        min = 1,
        max = MAX_POINTS,
        message = "Points must be between 1 and 1000."
    ))]
    pub points: i32,
    #[serde(default)]
    #[validate(nested)]
    pub options: Vec<OptionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptionDto {
    #[serde(default)]
    pub option_id: i64,
    #[validate(length(min = 1, message = "Option text is required."))]
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// Row returned by the quiz listing: no question detail, only the count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub quiz_id: i64,
    pub title: String,
    pub description: String,
    pub question_count: i64,
}

impl From<QuizDto> for Quiz {
    fn from(dto: QuizDto) -> Self {
        Self {
            id: dto.quiz_id,
            title: dto.title,
            description: dto.description,
            questions: dto
                .questions
                .into_iter()
                .map(|q| Question {
                    id: q.question_id,
                    text: q.text,
                    question_type: q.question_type,
                    points: q.points,
                    options: q
                        .options
                        .into_iter()
                        .map(|o| AnswerOption {
                            id: o.option_id,
                            text: o.text,
                            is_correct: o.is_correct,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl From<Quiz> for QuizDto {
    fn from(quiz: Quiz) -> Self {
        Self {
            quiz_id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            questions: quiz
                .questions
                .into_iter()
                .map(|q| QuestionDto {
                    question_id: q.id,
                    text: q.text,
                    question_type: q.question_type,
                    points: q.points,
                    options: q
                        .options
                        .into_iter()
                        .map(|o| OptionDto {
                            option_id: o.id,
                            text: o.text,
                            is_correct: o.is_correct,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
