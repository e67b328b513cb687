use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::{
    config::Config,
    repositories::{QuizRepository, SqliteQuizRepository},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub quizzes: Arc<dyn QuizRepository>,
}

impl AppState {
    /// State backed by the SQLite quiz repository on `pool`.
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let quizzes = Arc::new(SqliteQuizRepository::new(pool.clone()));
        Self {
            pool,
            config,
            quizzes,
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn QuizRepository> {
    fn from_ref(state: &AppState) -> Self {
        state.quizzes.clone()
    }
}
