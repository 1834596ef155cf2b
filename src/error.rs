use std::io;

use thiserror::Error;
use timer_core::{TimerError, TimerKind};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Timer(#[from] TimerError),

    #[error("No timer with id {0}")]
    UnknownTimer(u64),

    #[error("Timer {id} is not a {expected}")]
    WrongKind { id: u64, expected: &'static str },

    #[error("No timer ids left")]
    IdsExhausted,

    #[error("Label must not be empty")]
    EmptyLabel,

    #[error("No data directory available; pass --data-dir")]
    NoDataDir,
}

impl AppError {
    pub fn wrong_kind(id: u64, expected: TimerKind) -> Self {
        AppError::WrongKind {
            id,
            expected: expected.as_str(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
