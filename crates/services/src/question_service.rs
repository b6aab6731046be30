use std::sync::Arc;

use tracing::{debug, warn};
use trivia_core::fallback::fallback_questions;
use trivia_core::model::{Category, Difficulty, Question};

use crate::api::TriviaApi;

/// Where a question set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionSet {
    pub questions: Vec<Question>,
    pub source: QuestionSource,
}

/// Fetches question sets, degrading to the built-in set when generation fails.
#[derive(Clone)]
pub struct QuestionService {
    api: Arc<dyn TriviaApi>,
}

impl QuestionService {
    #[must_use]
    pub fn new(api: Arc<dyn TriviaApi>) -> Self {
        Self { api }
    }

    /// Ask the generator for `count` questions. Any failure, including an
    /// empty answer, yields the fallback set instead; this never errors.
    pub async fn fetch(&self, category: Category, difficulty: Difficulty, count: u32) -> QuestionSet {
        match self.api.generate_questions(category, difficulty, count).await {
            Ok(questions) if !questions.is_empty() => {
                debug!(%category, %difficulty, received = questions.len(), "questions generated");
                QuestionSet {
                    questions,
                    source: QuestionSource::Generated,
                }
            }
            Ok(_) => {
                warn!(%category, %difficulty, "generator returned no questions; using fallback set");
                Self::fallback()
            }
            Err(err) => {
                warn!(%category, %difficulty, error = %err, "question generation failed; using fallback set");
                Self::fallback()
            }
        }
    }

    fn fallback() -> QuestionSet {
        QuestionSet {
            questions: fallback_questions(),
            source: QuestionSource::Fallback,
        }
    }
}
