// src/scoring.rs

//! Client-side grading of a quiz attempt.
//!
//! Scoring is a pure function of the quiz (with its answer key) and the answers
//! collected during one attempt. It never fails: a missing answer, or an answer
//! whose shape does not fit the question type, is graded as incorrect.

use std::collections::{BTreeSet, HashMap};

use crate::models::quiz::{Question, QuestionType, Quiz};

/// The user's response to one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmittedAnswer {
    Single(i64),
    Multiple(BTreeSet<i64>),
    Text(String),
}

/// Answers of one attempt, keyed by question id.
/// A retake starts from a fresh (or cleared) set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    answers: HashMap<i64, SubmittedAnswer>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_single(&mut self, question_id: i64, option_id: i64) {
        self.answers
            .insert(question_id, SubmittedAnswer::Single(option_id));
    }

    /// Checks or unchecks one option of a multiple-choice question.
    pub fn toggle_option(&mut self, question_id: i64, option_id: i64, checked: bool) {
        let entry = self
            .answers
            .entry(question_id)
            .or_insert_with(|| SubmittedAnswer::Multiple(BTreeSet::new()));
        if !matches!(entry, SubmittedAnswer::Multiple(_)) {
            *entry = SubmittedAnswer::Multiple(BTreeSet::new());
        }
        if let SubmittedAnswer::Multiple(selected) = entry {
            if checked {
                selected.insert(option_id);
            } else {
                selected.remove(&option_id);
            }
        }
    }

    pub fn set_text(&mut self, question_id: i64, text: impl Into<String>) {
        self.answers
            .insert(question_id, SubmittedAnswer::Text(text.into()));
    }

    pub fn insert(&mut self, question_id: i64, answer: SubmittedAnswer) {
        self.answers.insert(question_id, answer);
    }

    pub fn get(&self, question_id: i64) -> Option<&SubmittedAnswer> {
        self.answers.get(&question_id)
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl FromIterator<(i64, SubmittedAnswer)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (i64, SubmittedAnswer)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}

/// Verdict and answer-sheet data for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionResult {
    pub question_id: i64,
    pub question_type: QuestionType,
    pub correct: bool,
    pub points_earned: i32,
    pub points_possible: i32,
    /// Options flagged correct in the answer key (choice questions).
    pub correct_option_ids: Vec<i64>,
    /// Options the user picked (choice questions), ascending.
    pub selected_option_ids: Vec<i64>,
    /// What the user typed (text questions).
    pub submitted_text: Option<String>,
    /// Accepted answer (text questions).
    pub correct_text: Option<String>,
}

/// Score band used to present a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    /// Below 50%.
    Fail,
    /// 50% up to 79%.
    Pass,
    /// 80% and above.
    Excellent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreReport {
    /// Totals over `i32` per-question points.
    pub earned: i64,
    pub possible: i64,
    /// round(100 * earned / possible); 0 for a quiz without questions.
    pub percentage: u32,
    pub questions: Vec<QuestionResult>,
}

impl ScoreReport {
    pub fn grade(&self) -> Grade {
        match self.percentage {
            p if p >= 80 => Grade::Excellent,
            p if p >= 50 => Grade::Pass,
            _ => Grade::Fail,
        }
    }

    pub fn correct_count(&self) -> usize {
        self.questions.iter().filter(|q| q.correct).count()
    }
}

/// Grades every question of `quiz` against `answers`, in quiz order.
pub fn score_quiz(quiz: &Quiz, answers: &AnswerSet) -> ScoreReport {
    let questions: Vec<QuestionResult> = quiz
        .questions
        .iter()
        .map(|q| grade_question(q, answers.get(q.id)))
        .collect();

    let earned = questions.iter().map(|r| i64::from(r.points_earned)).sum();
    let possible = questions.iter().map(|r| i64::from(r.points_possible)).sum();

    ScoreReport {
        earned,
        possible,
        percentage: percentage(earned, possible),
        questions,
    }
}

/// Rounded percentage, halves rounding up. Defined as 0 when nothing is possible.
pub fn percentage(earned: i64, possible: i64) -> u32 {
    if possible <= 0 {
        return 0;
    }
    let ratio = 100.0 * earned as f64 / possible as f64;
    (ratio + 0.5).floor().max(0.0) as u32
}

pub fn grade_question(question: &Question, answer: Option<&SubmittedAnswer>) -> QuestionResult {
    let points_possible = question.effective_points();
    let mut result = QuestionResult {
        question_id: question.id,
        question_type: question.question_type,
        correct: false,
        points_earned: 0,
        points_possible,
        correct_option_ids: Vec::new(),
        selected_option_ids: Vec::new(),
        submitted_text: None,
        correct_text: None,
    };

    result.correct = match question.question_type {
        QuestionType::SingleChoice => {
            // Only the first flagged option counts as the key.
            let key = question.correct_option_ids().next();
            result.correct_option_ids = key.into_iter().collect();
            let picked = match answer {
                Some(SubmittedAnswer::Single(id)) => Some(*id),
                _ => None,
            };
            result.selected_option_ids = picked.into_iter().collect();
            matches!((key, picked), (Some(k), Some(p)) if k == p)
        }
        QuestionType::MultipleChoice => {
            let key: BTreeSet<i64> = question.correct_option_ids().collect();
            // No answer is an empty selection; an answer of another shape never matches.
            let picked = match answer {
                Some(SubmittedAnswer::Multiple(ids)) => Some(ids.clone()),
                None => Some(BTreeSet::new()),
                Some(_) => None,
            };
            let correct = picked.as_ref() == Some(&key);
            result.correct_option_ids = key.into_iter().collect();
            result.selected_option_ids = picked.unwrap_or_default().into_iter().collect();
            correct
        }
        QuestionType::Text => {
            let key = question.accepted_text();
            let typed = match answer {
                Some(SubmittedAnswer::Text(text)) => Some(text.as_str()),
                _ => None,
            };
            result.correct_text = Some(key.to_string());
            result.submitted_text = typed.map(str::to_string);
            typed.is_some_and(|t| normalize(t) == normalize(key))
        }
    };

    if result.correct {
        result.points_earned = points_possible;
    }
    result
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
