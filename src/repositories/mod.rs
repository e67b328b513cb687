// src/repositories/mod.rs

pub mod quiz_repository;

pub use quiz_repository::{QuizRepository, SqliteQuizRepository};
