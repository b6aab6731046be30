//! Shared error types for the services crate.

use thiserror::Error;

use trivia_core::SessionError;
use trivia_core::model::QuestionError;

/// Errors emitted by `TriviaApi` implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("trivia api request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("trivia api returned no questions")]
    EmptyResponse,
    #[error("trivia api returned invalid question {id}: {source}")]
    InvalidQuestion {
        id: String,
        #[source]
        source: QuestionError,
    },
    #[error("trivia api unavailable: {0}")]
    Unavailable(String),
}

/// Errors emitted while starting a game.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
