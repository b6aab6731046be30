use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use trivia_core::model::{Category, Difficulty, GameResult, Question};

use super::wire::{CategoriesResponse, GenerateRequest, GenerateResponse, questions_from_response};
use super::{AchievementsOverview, ApiConfig, CategoryInfo, StatsUpdate, TriviaApi};
use crate::auth::AuthSession;
use crate::error::ApiError;

/// `TriviaApi` over the REST backend.
#[derive(Clone)]
pub struct HttpTriviaApi {
    client: Client,
    config: ApiConfig,
}

impl HttpTriviaApi {
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(ApiConfig::from_env())
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response: Response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl TriviaApi for HttpTriviaApi {
    async fn generate_questions(
        &self,
        category: Category,
        difficulty: Difficulty,
        count: u32,
    ) -> Result<Vec<Question>, ApiError> {
        let url = self.config.endpoint("trivia/generate");
        debug!(%url, %category, %difficulty, count, "requesting trivia questions");
        let payload = GenerateRequest {
            category,
            difficulty,
            count,
        };
        let body: GenerateResponse =
            Self::send_json(self.client.post(url).json(&payload)).await?;
        questions_from_response(body, difficulty)
    }

    async fn categories(&self) -> Result<Vec<CategoryInfo>, ApiError> {
        let url = self.config.endpoint("trivia/categories");
        let body: CategoriesResponse = Self::send_json(self.client.get(url)).await?;
        Ok(body.into_vec())
    }

    async fn report_game_stats(
        &self,
        auth: &AuthSession,
        result: &GameResult,
    ) -> Result<StatsUpdate, ApiError> {
        let url = self.config.endpoint("achievements/update-stats");
        debug!(%url, score = result.score, "reporting game stats");
        Self::send_json(
            self.client
                .post(url)
                .bearer_auth(auth.token())
                .json(result),
        )
        .await
    }

    async fn achievements(&self, auth: &AuthSession) -> Result<AchievementsOverview, ApiError> {
        let url = self.config.endpoint("achievements");
        Self::send_json(self.client.get(url).bearer_auth(auth.token())).await
    }
}
