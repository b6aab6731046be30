use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use trivia_core::model::{
    Achievement, Category, Difficulty, GameResult, PlayerStats, Question,
};

use super::{AchievementsOverview, CategoryInfo, StatsUpdate, TriviaApi};
use crate::auth::AuthSession;
use crate::error::ApiError;

#[derive(Default)]
struct State {
    questions: Vec<Question>,
    fail_questions: bool,
    fail_stats: bool,
    pending_unlocks: VecDeque<Vec<Achievement>>,
    achievements: Vec<Achievement>,
    stats: PlayerStats,
    reports: Vec<GameResult>,
    requests: Vec<(Category, Difficulty, u32)>,
}

/// In-process `TriviaApi` for tests and offline play.
///
/// Serves a fixed question bank and keeps lifetime stats in memory.
#[derive(Clone, Default)]
pub struct InMemoryTriviaApi {
    state: Arc<Mutex<State>>,
}

impl InMemoryTriviaApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_questions(self, questions: Vec<Question>) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.questions = questions;
        }
        self
    }

    #[must_use]
    pub fn with_achievements(self, achievements: Vec<Achievement>) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.achievements = achievements;
        }
        self
    }

    /// Make question generation fail until switched back.
    pub fn set_fail_questions(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_questions = fail;
        }
    }

    /// Make stats reporting fail until switched back.
    pub fn set_fail_stats(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_stats = fail;
        }
    }

    /// Queue badges to be returned as newly unlocked by the next report.
    pub fn unlock_on_next_report(&self, unlocked: Vec<Achievement>) {
        if let Ok(mut state) = self.state.lock() {
            state.pending_unlocks.push_back(unlocked);
        }
    }

    /// Results received so far, oldest first.
    #[must_use]
    pub fn reports(&self) -> Vec<GameResult> {
        self.state
            .lock()
            .map(|state| state.reports.clone())
            .unwrap_or_default()
    }

    /// Generation requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<(Category, Difficulty, u32)> {
        self.state
            .lock()
            .map(|state| state.requests.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, ApiError> {
        self.state
            .lock()
            .map_err(|e| ApiError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl TriviaApi for InMemoryTriviaApi {
    async fn generate_questions(
        &self,
        category: Category,
        difficulty: Difficulty,
        count: u32,
    ) -> Result<Vec<Question>, ApiError> {
        let mut state = self.lock()?;
        state.requests.push((category, difficulty, count));
        if state.fail_questions {
            return Err(ApiError::Unavailable("question generation disabled".into()));
        }

        let take = usize::try_from(count).unwrap_or(usize::MAX);
        let questions: Vec<Question> = state.questions.iter().take(take).cloned().collect();
        if questions.is_empty() {
            return Err(ApiError::EmptyResponse);
        }
        Ok(questions)
    }

    async fn categories(&self) -> Result<Vec<CategoryInfo>, ApiError> {
        Ok(Category::ALL
            .into_iter()
            .map(|c| CategoryInfo {
                id: c.id().to_owned(),
                name: c.display_name().to_owned(),
                description: None,
            })
            .collect())
    }

    async fn report_game_stats(
        &self,
        _auth: &AuthSession,
        result: &GameResult,
    ) -> Result<StatsUpdate, ApiError> {
        let mut state = self.lock()?;
        if state.fail_stats {
            return Err(ApiError::Unavailable("stats reporting disabled".into()));
        }

        state.reports.push(*result);
        state.stats.games_played += 1;
        state.stats.total_score += u64::from(result.score);
        state.stats.longest_streak = state.stats.longest_streak.max(result.longest_streak);
        if result.is_perfect {
            state.stats.perfect_games += 1;
        }

        let new_achievements = state.pending_unlocks.pop_front().unwrap_or_default();
        for unlocked in &new_achievements {
            match state.achievements.iter_mut().find(|a| a.id == unlocked.id) {
                Some(existing) => existing.unlocked = true,
                None => {
                    let mut badge = unlocked.clone();
                    badge.unlocked = true;
                    state.achievements.push(badge);
                }
            }
        }

        Ok(StatsUpdate { new_achievements })
    }

    async fn achievements(&self, _auth: &AuthSession) -> Result<AchievementsOverview, ApiError> {
        let state = self.lock()?;
        let total_unlocked = state.achievements.iter().filter(|a| a.unlocked).count();
        Ok(AchievementsOverview {
            achievements: state.achievements.clone(),
            stats: Some(state.stats),
            total_unlocked: u32::try_from(total_unlocked).unwrap_or(u32::MAX),
            total_badges: u32::try_from(state.achievements.len()).unwrap_or(u32::MAX),
        })
    }
}
