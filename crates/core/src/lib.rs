#![forbid(unsafe_code)]

pub mod fallback;
pub mod model;
pub mod scoring;
pub mod session;
pub mod time;

pub use session::{AnswerOutcome, SessionError, SessionPhase, TickOutcome, TriviaSession};
pub use time::Clock;
