mod achievement;
mod category;
mod ids;
mod question;
mod result;

pub use ids::{GameId, ParseIdError, QuestionId};

pub use achievement::{Achievement, PlayerStats, Rarity};
pub use category::{Category, UnknownCategory};
pub use question::{Difficulty, OPTIONS_PER_QUESTION, Question, QuestionDraft, QuestionError};
pub use result::{GameResult, GameSummary, GameSummaryError};
