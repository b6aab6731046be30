use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::model::{Difficulty, GameId, GameResult, GameSummary, Question, QuestionId};
use crate::scoring::points_for_correct_answer;
use crate::time::Clock;

/// Lives a player starts every game with.
pub const STARTING_LIVES: u8 = 3;

/// Default countdown budget for a single question.
pub const DEFAULT_SECONDS_PER_QUESTION: u32 = 30;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions supplied for session")]
    Empty,
}

//
// ─── PHASES AND OUTCOMES ───────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    NotStarted,
    AwaitingAnswer,
    ShowingExplanation,
    GameOver,
}

/// How the current question was resolved, by a selection or by the timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question_id: QuestionId,
    /// `None` when the countdown ran out.
    pub selected: Option<usize>,
    pub correct_index: usize,
    pub is_correct: bool,
    pub points_awarded: u32,
    pub lives: u8,
    pub streak: u32,
    /// Phase entered after resolution: explanation, or game over.
    pub phase: SessionPhase,
}

impl AnswerOutcome {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.selected.is_none()
    }

    #[must_use]
    pub fn ends_game(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Countdown is not armed; the tick changed nothing.
    Idle,
    Counting { time_left: u32 },
    TimedOut(AnswerOutcome),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One timed trivia game: question order, scoring, lives, streak and countdown.
///
/// The session is a plain state machine. It never sleeps; whoever owns it
/// feeds it one `tick` per elapsed second. Calls made outside an operation's
/// precondition leave the state untouched and return `None`.
pub struct TriviaSession {
    clock: Clock,
    seconds_per_question: u32,
    game_id: Option<GameId>,
    difficulty: Difficulty,
    questions: Vec<Question>,
    current: usize,
    selected: Option<usize>,
    score: u32,
    lives: u8,
    streak: u32,
    correct_answers: u32,
    time_left: u32,
    timer_running: bool,
    phase: SessionPhase,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    result: Option<GameResult>,
}

impl Default for TriviaSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TriviaSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: Clock::default(),
            seconds_per_question: DEFAULT_SECONDS_PER_QUESTION,
            game_id: None,
            difficulty: Difficulty::default(),
            questions: Vec::new(),
            current: 0,
            selected: None,
            score: 0,
            lives: STARTING_LIVES,
            streak: 0,
            correct_answers: 0,
            time_left: DEFAULT_SECONDS_PER_QUESTION,
            timer_running: false,
            phase: SessionPhase::NotStarted,
            started_at: None,
            finished_at: None,
            result: None,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Countdown budget per question. Zero is raised to one second.
    #[must_use]
    pub fn with_seconds_per_question(mut self, seconds: u32) -> Self {
        self.seconds_per_question = seconds.max(1);
        self.time_left = self.seconds_per_question;
        self
    }

    /// Begin a fresh game over `questions`, discarding any previous state.
    ///
    /// `difficulty` is the tier the set was requested at; scoring uses each
    /// question's own difficulty.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if `questions` is empty. The session is
    /// left unchanged in that case.
    pub fn start(
        &mut self,
        questions: Vec<Question>,
        difficulty: Difficulty,
    ) -> Result<(), SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        self.reset();
        self.game_id = Some(GameId::generate());
        self.difficulty = difficulty;
        self.questions = questions;
        self.started_at = Some(self.clock.now());
        self.phase = SessionPhase::AwaitingAnswer;
        self.timer_running = true;
        Ok(())
    }

    /// Answer the current question with the option at `option_index`.
    ///
    /// Returns `None` (and changes nothing) unless the session is awaiting an
    /// answer and `option_index` names one of the question's options.
    pub fn select_answer(&mut self, option_index: usize) -> Option<AnswerOutcome> {
        if self.phase != SessionPhase::AwaitingAnswer || self.selected.is_some() {
            return None;
        }
        let option_count = self.current_question()?.options().len();
        if option_index >= option_count {
            return None;
        }

        self.timer_running = false;
        self.selected = Some(option_index);
        self.resolve(Some(option_index))
    }

    /// Resolve the current question as unanswered, as if time ran out.
    pub fn timeout(&mut self) -> Option<AnswerOutcome> {
        if self.phase != SessionPhase::AwaitingAnswer || self.selected.is_some() {
            return None;
        }

        self.timer_running = false;
        self.time_left = 0;
        self.resolve(None)
    }

    /// Count one second off the current question.
    ///
    /// The countdown disarms itself when it reaches zero, so a late tick can
    /// never produce a second timeout for the same question.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.timer_running || self.phase != SessionPhase::AwaitingAnswer {
            return TickOutcome::Idle;
        }

        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left > 0 {
            return TickOutcome::Counting {
                time_left: self.time_left,
            };
        }

        match self.timeout() {
            Some(outcome) => TickOutcome::TimedOut(outcome),
            None => TickOutcome::Idle,
        }
    }

    /// Move on from the explanation to the next question, or end the game
    /// after the last one. Returns the phase entered.
    pub fn advance(&mut self) -> Option<SessionPhase> {
        if self.phase != SessionPhase::ShowingExplanation {
            return None;
        }

        if self.current + 1 >= self.questions.len() {
            self.finish();
        } else {
            self.current += 1;
            self.selected = None;
            self.time_left = self.seconds_per_question;
            self.timer_running = true;
            self.phase = SessionPhase::AwaitingAnswer;
        }
        Some(self.phase)
    }

    /// Return to the pre-start condition. Valid from any phase.
    pub fn reset(&mut self) {
        self.game_id = None;
        self.difficulty = Difficulty::default();
        self.questions.clear();
        self.current = 0;
        self.selected = None;
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.streak = 0;
        self.correct_answers = 0;
        self.time_left = self.seconds_per_question;
        self.timer_running = false;
        self.phase = SessionPhase::NotStarted;
        self.started_at = None;
        self.finished_at = None;
        self.result = None;
    }

    fn resolve(&mut self, selected: Option<usize>) -> Option<AnswerOutcome> {
        let question = self.current_question()?;
        let question_id = question.id().clone();
        let correct_index = question.correct_index();
        let difficulty = question.difficulty();
        let is_correct = selected == Some(correct_index);

        let mut points_awarded = 0;
        if is_correct {
            points_awarded = points_for_correct_answer(difficulty, self.streak);
            self.score = self.score.saturating_add(points_awarded);
            self.streak += 1;
            self.correct_answers += 1;
            self.phase = SessionPhase::ShowingExplanation;
        } else {
            self.lives = self.lives.saturating_sub(1);
            self.streak = 0;
            if self.lives == 0 {
                self.finish();
            } else {
                self.phase = SessionPhase::ShowingExplanation;
            }
        }

        Some(AnswerOutcome {
            question_id,
            selected,
            correct_index,
            is_correct,
            points_awarded,
            lives: self.lives,
            streak: self.streak,
            phase: self.phase,
        })
    }

    fn finish(&mut self) {
        self.timer_running = false;
        self.phase = SessionPhase::GameOver;
        // A wall clock stepped backwards must not produce a negative duration.
        let now = self.clock.now();
        self.finished_at = Some(self.started_at.map_or(now, |started| now.max(started)));

        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        let answered = u32::try_from(self.current + 1).unwrap_or(u32::MAX);
        self.result = Some(GameResult {
            score: self.score,
            questions_answered: answered,
            correct_answers: self.correct_answers,
            is_perfect: self.lives == STARTING_LIVES && self.correct_answers == total,
            longest_streak: self.streak,
        });
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    #[must_use]
    pub fn game_id(&self) -> Option<GameId> {
        self.game_id
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn lives(&self) -> u8 {
        self.lives
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    #[must_use]
    pub fn seconds_per_question(&self) -> u32 {
        self.seconds_per_question
    }

    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.timer_running
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Final result, available once the game is over.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// Game-over summary, available once the game is over.
    #[must_use]
    pub fn summary(&self) -> Option<GameSummary> {
        let result = self.result?;
        GameSummary::new(
            self.game_id?,
            self.difficulty,
            result,
            u32::try_from(self.questions.len()).unwrap_or(u32::MAX),
            self.lives,
            self.started_at?,
            self.finished_at?,
        )
        .ok()
    }
}

impl fmt::Debug for TriviaSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriviaSession")
            .field("game_id", &self.game_id)
            .field("phase", &self.phase)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("lives", &self.lives)
            .field("streak", &self.streak)
            .field("time_left", &self.time_left)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
