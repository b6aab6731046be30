use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Difficulty, GameId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameSummaryError {
    #[error("finished_at is before started_at")]
    InvalidTimeRange,

    #[error("answered ({answered}) exceeds total questions ({total})")]
    AnsweredExceedsTotal { answered: u32, total: u32 },

    #[error("correct answers ({correct}) exceed answered questions ({answered})")]
    CorrectExceedsAnswered { correct: u32, answered: u32 },
}

/// Outcome of one finished game, in the shape reported to the stats service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub score: u32,
    pub questions_answered: u32,
    pub correct_answers: u32,
    pub is_perfect: bool,
    pub longest_streak: u32,
}

/// Everything the game-over screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    game_id: GameId,
    difficulty: Difficulty,
    result: GameResult,
    total_questions: u32,
    lives_left: u8,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl GameSummary {
    /// Build a summary for a finished game.
    ///
    /// # Errors
    ///
    /// Returns `GameSummaryError` if the timestamps are reversed or the counters
    /// are inconsistent with each other.
    pub fn new(
        game_id: GameId,
        difficulty: Difficulty,
        result: GameResult,
        total_questions: u32,
        lives_left: u8,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Result<Self, GameSummaryError> {
        if finished_at < started_at {
            return Err(GameSummaryError::InvalidTimeRange);
        }
        if result.questions_answered > total_questions {
            return Err(GameSummaryError::AnsweredExceedsTotal {
                answered: result.questions_answered,
                total: total_questions,
            });
        }
        if result.correct_answers > result.questions_answered {
            return Err(GameSummaryError::CorrectExceedsAnswered {
                correct: result.correct_answers,
                answered: result.questions_answered,
            });
        }

        Ok(Self {
            game_id,
            difficulty,
            result,
            total_questions,
            lives_left,
            started_at,
            finished_at,
        })
    }

    #[must_use]
    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn result(&self) -> &GameResult {
        &self.result
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.result.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn lives_left(&self) -> u8 {
        self.lives_left
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.finished_at - self.started_at
    }

    /// Score as a percentage of the hard-tier maximum for the question count.
    ///
    /// Streak bonuses can push this above 100.
    #[must_use]
    pub fn score_percentage(&self) -> u32 {
        let max = u64::from(self.total_questions) * 30;
        if max == 0 {
            return 0;
        }
        let pct = (u64::from(self.result.score) * 100 + max / 2) / max;
        u32::try_from(pct).unwrap_or(u32::MAX)
    }

    /// Share of answered questions that were answered correctly, in `0.0..=1.0`.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.result.questions_answered == 0 {
            return 0.0;
        }
        f64::from(self.result.correct_answers) / f64::from(self.result.questions_answered)
    }
}
