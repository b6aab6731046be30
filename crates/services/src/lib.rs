#![forbid(unsafe_code)]

pub mod achievement_service;
pub mod api;
pub mod auth;
pub mod error;
pub mod game;
pub mod question_service;
pub mod timer;

pub use trivia_core::Clock;

pub use achievement_service::{AchievementFilter, AchievementService};
pub use api::{
    AchievementsOverview, ApiConfig, CategoryInfo, HttpTriviaApi, InMemoryTriviaApi, StatsUpdate,
    TriviaApi,
};
pub use auth::AuthSession;
pub use error::{ApiError, GameError};
pub use game::{ActiveGame, GameSettings, TriviaGameService};
pub use question_service::{QuestionService, QuestionSet, QuestionSource};
pub use timer::CountdownTimer;
