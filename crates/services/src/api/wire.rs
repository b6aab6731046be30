//! JSON shapes exchanged with the backend.

use serde::{Deserialize, Serialize};

use trivia_core::model::{Category, Difficulty, Question, QuestionDraft, QuestionId};

use super::CategoryInfo;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub(super) struct GenerateRequest {
    pub category: Category,
    pub difficulty: Difficulty,
    pub count: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct GenerateResponse {
    #[serde(default)]
    pub questions: Vec<WireQuestion>,
}

/// Question ids arrive as strings or numbers depending on the generator.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum WireId {
    Text(String),
    Number(u64),
}

impl WireId {
    fn into_string(self) -> String {
        match self {
            WireId::Text(s) => s,
            WireId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireQuestion {
    pub id: WireId,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl WireQuestion {
    /// Convert into a validated `Question`. Questions without a difficulty
    /// inherit the requested one.
    pub fn into_question(self, requested: Difficulty) -> Result<Question, ApiError> {
        let id = self.id.into_string();
        QuestionDraft {
            id: QuestionId::new(id.clone()),
            prompt: self.question,
            options: self.options,
            correct_index: self.correct_answer,
            explanation: self.explanation,
            reference: self.reference,
            difficulty: self.difficulty.unwrap_or(requested),
        }
        .validate()
        .map_err(|source| ApiError::InvalidQuestion { id, source })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum CategoriesResponse {
    Wrapped { categories: Vec<CategoryInfo> },
    Bare(Vec<CategoryInfo>),
}

impl CategoriesResponse {
    pub fn into_vec(self) -> Vec<CategoryInfo> {
        match self {
            CategoriesResponse::Wrapped { categories } | CategoriesResponse::Bare(categories) => {
                categories
            }
        }
    }
}

/// Validate a whole generator response. One bad question rejects the set.
pub(super) fn questions_from_response(
    response: GenerateResponse,
    requested: Difficulty,
) -> Result<Vec<Question>, ApiError> {
    if response.questions.is_empty() {
        return Err(ApiError::EmptyResponse);
    }
    response
        .questions
        .into_iter()
        .map(|q| q.into_question(requested))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AchievementsOverview, StatsUpdate};
    use trivia_core::model::Rarity;

    #[test]
    fn generate_request_uses_backend_ids() {
        let json = serde_json::to_value(GenerateRequest {
            category: Category::NewTestament,
            difficulty: Difficulty::Hard,
            count: 10,
        })
        .unwrap();
        assert_eq!(json["category"], "new-testament");
        assert_eq!(json["difficulty"], "hard");
        assert_eq!(json["count"], 10);
    }

    #[test]
    fn response_with_numeric_ids_parses() {
        let body = r#"{"questions":[{"id":7,"question":"Who?","options":["a","b","c","d"],
            "correctAnswer":3,"explanation":"e","reference":"r","difficulty":"easy"}]}"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        let questions = questions_from_response(response, Difficulty::Medium).unwrap();
        assert_eq!(questions[0].id().as_str(), "7");
        assert_eq!(questions[0].difficulty(), Difficulty::Easy);
        assert_eq!(questions[0].correct_index(), 3);
    }

    #[test]
    fn missing_difficulty_inherits_requested() {
        let body = r#"{"questions":[{"id":"a","question":"Who?","options":["a","b","c","d"],
            "correctAnswer":0}]}"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        let questions = questions_from_response(response, Difficulty::Hard).unwrap();
        assert_eq!(questions[0].difficulty(), Difficulty::Hard);
    }

    #[test]
    fn invalid_question_rejects_set() {
        let body = r#"{"questions":[{"id":"a","question":"Who?","options":["a","b"],
            "correctAnswer":0}]}"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        let err = questions_from_response(response, Difficulty::Easy).unwrap_err();
        assert!(matches!(err, ApiError::InvalidQuestion { ref id, .. } if id == "a"));
    }

    #[test]
    fn empty_response_is_an_error() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        let err = questions_from_response(response, Difficulty::Easy).unwrap_err();
        assert!(matches!(err, ApiError::EmptyResponse));
    }

    #[test]
    fn categories_accept_both_shapes() {
        let wrapped: CategoriesResponse =
            serde_json::from_str(r#"{"categories":[{"id":"jesus","name":"Life of Jesus"}]}"#)
                .unwrap();
        let bare: CategoriesResponse =
            serde_json::from_str(r#"[{"id":"jesus","name":"Life of Jesus"}]"#).unwrap();
        assert_eq!(wrapped.into_vec(), bare.into_vec());
    }

    #[test]
    fn stats_update_reads_new_achievements() {
        let body = r#"{"newAchievements":[{"id":"perfect-round","name":"Perfect Round",
            "icon":"trophy","type":"perfect","rarity":"epic","unlocked":true,
            "unlockedAt":"2024-05-01T12:00:00Z"}]}"#;
        let update: StatsUpdate = serde_json::from_str(body).unwrap();

        assert_eq!(update.new_achievements.len(), 1);
        let badge = &update.new_achievements[0];
        assert_eq!(badge.id, "perfect-round");
        assert_eq!(badge.kind, "perfect");
        assert_eq!(badge.rarity, Rarity::Epic);
        assert!(badge.unlocked_at.is_some());

        let none: StatsUpdate = serde_json::from_str("{}").unwrap();
        assert!(none.new_achievements.is_empty());
    }

    #[test]
    fn achievements_overview_reads_camel_case_totals() {
        let body = r#"{"achievements":[{"id":"first-game","name":"First Steps",
            "progress":1,"maxProgress":5,"percentage":20}],
            "stats":{"gamesPlayed":2,"totalScore":140,"longestStreak":4},
            "totalUnlocked":1,"totalBadges":4}"#;
        let overview: AchievementsOverview = serde_json::from_str(body).unwrap();

        assert_eq!(overview.total_unlocked, 1);
        assert_eq!(overview.total_badges, 4);
        assert_eq!(overview.achievements[0].max_progress, 5);
        let stats = overview.stats.unwrap();
        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.total_score, 140);
        assert_eq!(stats.longest_streak, 4);
        assert_eq!(stats.perfect_games, 0);
    }
}
