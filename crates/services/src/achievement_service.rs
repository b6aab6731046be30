use std::sync::Arc;

use trivia_core::model::Achievement;

use crate::api::{AchievementsOverview, TriviaApi};
use crate::auth::AuthSession;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AchievementFilter {
    #[default]
    All,
    Unlocked,
    Locked,
}

impl AchievementFilter {
    #[must_use]
    pub fn matches(self, achievement: &Achievement) -> bool {
        match self {
            AchievementFilter::All => true,
            AchievementFilter::Unlocked => achievement.unlocked,
            AchievementFilter::Locked => !achievement.unlocked,
        }
    }
}

impl AchievementsOverview {
    /// Badges passing `filter`, in service order.
    pub fn filtered(&self, filter: AchievementFilter) -> impl Iterator<Item = &Achievement> {
        self.achievements.iter().filter(move |a| filter.matches(a))
    }

    /// Unlocked share of all badges as a rounded percentage; 0 with no badges.
    #[must_use]
    pub fn completion_percentage(&self) -> u32 {
        if self.total_badges == 0 {
            return 0;
        }
        let unlocked = u64::from(self.total_unlocked.min(self.total_badges));
        let total = u64::from(self.total_badges);
        u32::try_from((unlocked * 100 + total / 2) / total).unwrap_or(100)
    }
}

/// Loads the achievements screen data for a player.
#[derive(Clone)]
pub struct AchievementService {
    api: Arc<dyn TriviaApi>,
}

impl AchievementService {
    #[must_use]
    pub fn new(api: Arc<dyn TriviaApi>) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Propagates `ApiError` from the backend.
    pub async fn overview(&self, auth: &AuthSession) -> Result<AchievementsOverview, ApiError> {
        self.api.achievements(auth).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryTriviaApi;

    fn badge(id: &str, unlocked: bool) -> Achievement {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": id,
            "unlocked": unlocked,
        }))
        .unwrap()
    }

    #[test]
    fn completion_rounds_to_nearest() {
        let overview = AchievementsOverview {
            achievements: Vec::new(),
            stats: None,
            total_unlocked: 2,
            total_badges: 3,
        };
        assert_eq!(overview.completion_percentage(), 67);
    }

    #[test]
    fn no_badges_is_zero_percent() {
        assert_eq!(AchievementsOverview::default().completion_percentage(), 0);
    }

    #[tokio::test]
    async fn overview_filters_by_lock_state() {
        let api = InMemoryTriviaApi::new().with_achievements(vec![
            badge("a", true),
            badge("b", false),
            badge("c", false),
        ]);
        let service = AchievementService::new(Arc::new(api));

        let overview = service.overview(&AuthSession::anonymous()).await.unwrap();

        assert_eq!(overview.filtered(AchievementFilter::All).count(), 3);
        assert_eq!(overview.filtered(AchievementFilter::Unlocked).count(), 1);
        let locked: Vec<_> = overview
            .filtered(AchievementFilter::Locked)
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(locked, vec!["b", "c"]);
        assert_eq!(overview.completion_percentage(), 33);
    }
}
