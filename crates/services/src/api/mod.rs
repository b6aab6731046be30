//! Client side of the trivia and achievements backend.

mod config;
mod http;
mod memory;
mod wire;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use trivia_core::model::{Achievement, Category, Difficulty, GameResult, PlayerStats, Question};

use crate::auth::AuthSession;
use crate::error::ApiError;

pub use config::ApiConfig;
pub use http::HttpTriviaApi;
pub use memory::InMemoryTriviaApi;

/// Response to a stats report: badges unlocked by the reported game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsUpdate {
    #[serde(default)]
    pub new_achievements: Vec<Achievement>,
}

/// The player's badges and lifetime stats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementsOverview {
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub stats: Option<PlayerStats>,
    #[serde(default)]
    pub total_unlocked: u32,
    #[serde(default)]
    pub total_badges: u32,
}

/// A category as advertised by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Remote collaborator for question generation and stat tracking.
///
/// Every call is a single attempt; callers decide how to degrade.
#[async_trait]
pub trait TriviaApi: Send + Sync {
    /// Generate `count` questions for a category and difficulty.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, a non-success status, an empty
    /// list, or a question that fails validation.
    async fn generate_questions(
        &self,
        category: Category,
        difficulty: Difficulty,
        count: u32,
    ) -> Result<Vec<Question>, ApiError>;

    /// List the categories the generator supports.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or a non-success status.
    async fn categories(&self) -> Result<Vec<CategoryInfo>, ApiError>;

    /// Record a finished game against the player's lifetime stats.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or a non-success status.
    async fn report_game_stats(
        &self,
        auth: &AuthSession,
        result: &GameResult,
    ) -> Result<StatsUpdate, ApiError>;

    /// Fetch the player's badges and lifetime stats.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or a non-success status.
    async fn achievements(&self, auth: &AuthSession) -> Result<AchievementsOverview, ApiError>;
}
