use std::fmt;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use trivia_core::model::{Achievement, Category, Difficulty, GameResult, GameSummary};
use trivia_core::session::DEFAULT_SECONDS_PER_QUESTION;
use trivia_core::{AnswerOutcome, Clock, SessionPhase, TickOutcome, TriviaSession};

use crate::api::TriviaApi;
use crate::auth::AuthSession;
use crate::error::GameError;
use crate::question_service::{QuestionService, QuestionSource};
use crate::timer::CountdownTimer;

/// Questions requested per game unless configured otherwise.
pub const DEFAULT_QUESTION_COUNT: u32 = 10;

/// Setup choices for one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    pub category: Category,
    pub difficulty: Difficulty,
    pub question_count: u32,
    pub seconds_per_question: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            category: Category::All,
            difficulty: Difficulty::Medium,
            question_count: DEFAULT_QUESTION_COUNT,
            seconds_per_question: DEFAULT_SECONDS_PER_QUESTION,
        }
    }
}

impl GameSettings {
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn with_question_count(mut self, count: u32) -> Self {
        self.question_count = count.max(1);
        self
    }

    #[must_use]
    pub fn with_seconds_per_question(mut self, seconds: u32) -> Self {
        self.seconds_per_question = seconds.max(1);
        self
    }
}

/// Starts games: fetches questions, then hands back a running `ActiveGame`.
#[derive(Clone)]
pub struct TriviaGameService {
    clock: Clock,
    api: Arc<dyn TriviaApi>,
    questions: QuestionService,
    auth: AuthSession,
}

impl TriviaGameService {
    #[must_use]
    pub fn new(clock: Clock, api: Arc<dyn TriviaApi>, auth: AuthSession) -> Self {
        Self {
            clock,
            questions: QuestionService::new(Arc::clone(&api)),
            api,
            auth,
        }
    }

    /// Fetch a question set (falling back to the built-in set on failure)
    /// and start the countdown on the first question.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Session` if no questions could be obtained at all.
    pub async fn start_game(&self, settings: GameSettings) -> Result<ActiveGame, GameError> {
        let set = self
            .questions
            .fetch(settings.category, settings.difficulty, settings.question_count)
            .await;

        let mut session = TriviaSession::new()
            .with_clock(self.clock)
            .with_seconds_per_question(settings.seconds_per_question);
        session.start(set.questions, settings.difficulty)?;

        let mut timer = CountdownTimer::new();
        timer.arm();

        info!(
            game_id = ?session.game_id(),
            category = %settings.category,
            difficulty = %settings.difficulty,
            questions = session.total_questions(),
            source = ?set.source,
            "trivia game started"
        );

        Ok(ActiveGame {
            session,
            timer,
            settings,
            source: set.source,
            api: Arc::clone(&self.api),
            auth: self.auth.clone(),
            report: None,
        })
    }
}

/// A game in progress: the session, its countdown, and the pending stats report.
pub struct ActiveGame {
    session: TriviaSession,
    timer: CountdownTimer,
    settings: GameSettings,
    source: QuestionSource,
    api: Arc<dyn TriviaApi>,
    auth: AuthSession,
    report: Option<StatsReport>,
}

/// The end-of-game stats report. Deferred when the game ended outside a
/// tokio runtime; it is then sent by `new_achievements`.
enum StatsReport {
    Spawned(JoinHandle<Vec<Achievement>>),
    Deferred(GameResult),
}

impl ActiveGame {
    #[must_use]
    pub fn session(&self) -> &TriviaSession {
        &self.session
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub fn source(&self) -> QuestionSource {
        self.source
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    #[must_use]
    pub fn timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    /// Wait one countdown second and apply it.
    ///
    /// Returns `None` at once when no question is being timed, so it can sit
    /// behind a `timer_armed()` guard in a `select!` loop.
    pub async fn next_tick(&mut self) -> Option<TickOutcome> {
        if !self.timer.tick().await {
            return None;
        }

        let outcome = self.session.tick();
        match &outcome {
            TickOutcome::TimedOut(resolved) => {
                debug!(question = %resolved.question_id, lives = resolved.lives, "question timed out");
                self.after_resolution();
            }
            TickOutcome::Idle => self.timer.disarm(),
            TickOutcome::Counting { .. } => {}
        }
        Some(outcome)
    }

    pub fn select_answer(&mut self, option_index: usize) -> Option<AnswerOutcome> {
        let outcome = self.session.select_answer(option_index)?;
        debug!(
            question = %outcome.question_id,
            correct = outcome.is_correct,
            points = outcome.points_awarded,
            lives = outcome.lives,
            "answer selected"
        );
        self.after_resolution();
        Some(outcome)
    }

    /// Resolve the current question as timed out without waiting for the clock.
    pub fn timeout(&mut self) -> Option<AnswerOutcome> {
        let outcome = self.session.timeout()?;
        self.after_resolution();
        Some(outcome)
    }

    pub fn advance(&mut self) -> Option<SessionPhase> {
        let phase = self.session.advance()?;
        match phase {
            SessionPhase::AwaitingAnswer => self.timer.arm(),
            SessionPhase::GameOver => self.on_game_over(),
            SessionPhase::NotStarted | SessionPhase::ShowingExplanation => {}
        }
        Some(phase)
    }

    /// Abandon the game. A stats report already in flight is left to finish.
    pub fn reset(&mut self) {
        self.timer.disarm();
        self.session.reset();
        info!("trivia game reset");
    }

    #[must_use]
    pub fn summary(&self) -> Option<GameSummary> {
        self.session.summary()
    }

    /// Badges unlocked by this game's stats report.
    ///
    /// Waits for the report if it is still in flight, or sends it now if it was
    /// deferred. Empty when the game is not over, the report failed, or it was
    /// already collected.
    pub async fn new_achievements(&mut self) -> Vec<Achievement> {
        match self.report.take() {
            None => Vec::new(),
            Some(StatsReport::Deferred(result)) => {
                send_report(Arc::clone(&self.api), self.auth.clone(), result).await
            }
            Some(StatsReport::Spawned(handle)) => match handle.await {
                Ok(unlocked) => unlocked,
                Err(err) => {
                    warn!(error = %err, "stats report task did not complete");
                    Vec::new()
                }
            },
        }
    }

    fn after_resolution(&mut self) {
        self.timer.disarm();
        if self.session.is_over() {
            self.on_game_over();
        }
    }

    fn on_game_over(&mut self) {
        self.timer.disarm();
        let Some(result) = self.session.result() else {
            return;
        };
        info!(
            game_id = ?self.session.game_id(),
            score = result.score,
            answered = result.questions_answered,
            correct = result.correct_answers,
            perfect = result.is_perfect,
            "trivia game over"
        );
        if self.report.is_none() {
            self.report = Some(spawn_report(
                Arc::clone(&self.api),
                self.auth.clone(),
                result,
            ));
        }
    }
}

impl fmt::Debug for ActiveGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveGame")
            .field("session", &self.session)
            .field("settings", &self.settings)
            .field("source", &self.source)
            .field("timer_armed", &self.timer.is_armed())
            .field("report_pending", &self.report.is_some())
            .finish_non_exhaustive()
    }
}

/// Send the result in the background when a runtime is available.
fn spawn_report(api: Arc<dyn TriviaApi>, auth: AuthSession, result: GameResult) -> StatsReport {
    match Handle::try_current() {
        Ok(handle) => StatsReport::Spawned(handle.spawn(send_report(api, auth, result))),
        Err(_) => {
            debug!("no tokio runtime at game over, stats report deferred");
            StatsReport::Deferred(result)
        }
    }
}

/// Failures are logged and read as "no new badges".
async fn send_report(
    api: Arc<dyn TriviaApi>,
    auth: AuthSession,
    result: GameResult,
) -> Vec<Achievement> {
    match api.report_game_stats(&auth, &result).await {
        Ok(update) => {
            if !update.new_achievements.is_empty() {
                info!(count = update.new_achievements.len(), "achievements unlocked");
            }
            update.new_achievements
        }
        Err(err) => {
            warn!(error = %err, "failed to report game stats");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryTriviaApi;
    use trivia_core::fallback::fallback_questions;
    use trivia_core::time::fixed_now;

    fn service(api: &InMemoryTriviaApi) -> TriviaGameService {
        TriviaGameService::new(
            Clock::fixed(fixed_now()),
            Arc::new(api.clone()),
            AuthSession::new("u1", "t1"),
        )
    }

    #[test]
    fn settings_default_to_ten_medium_questions() {
        let settings = GameSettings::default();
        assert_eq!(settings.question_count, 10);
        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert_eq!(settings.seconds_per_question, 30);
        assert_eq!(GameSettings::default().with_question_count(0).question_count, 1);
    }

    #[tokio::test]
    async fn start_arms_timer_and_requests_configured_count() {
        let api = InMemoryTriviaApi::new();
        api.set_fail_questions(true);
        let game = service(&api)
            .start_game(GameSettings::default().with_question_count(7))
            .await
            .unwrap();

        assert_eq!(game.phase(), SessionPhase::AwaitingAnswer);
        assert!(game.timer_armed());
        assert_eq!(game.source(), QuestionSource::Fallback);
        assert_eq!(api.requests(), vec![(Category::All, Difficulty::Medium, 7)]);
    }

    #[tokio::test]
    async fn answer_disarms_and_advance_rearms() {
        let api = InMemoryTriviaApi::new();
        let mut game = service(&api).start_game(GameSettings::default()).await.unwrap();

        let correct = game.session().current_question().unwrap().correct_index();
        game.select_answer(correct).unwrap();
        assert!(!game.timer_armed());

        assert_eq!(game.advance(), Some(SessionPhase::AwaitingAnswer));
        assert!(game.timer_armed());
    }

    #[tokio::test]
    async fn reset_disarms_timer() {
        let api = InMemoryTriviaApi::new();
        let mut game = service(&api).start_game(GameSettings::default()).await.unwrap();
        game.reset();
        assert!(!game.timer_armed());
        assert_eq!(game.phase(), SessionPhase::NotStarted);
        assert!(game.next_tick().await.is_none());
    }

    #[test]
    fn game_can_be_driven_after_its_runtime_is_gone() {
        let api = InMemoryTriviaApi::new().with_questions(fallback_questions());
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let mut game = runtime
            .block_on(service(&api).start_game(GameSettings::default()))
            .unwrap();
        drop(runtime);

        while game.phase() != SessionPhase::GameOver {
            let correct = game.session().current_question().unwrap().correct_index();
            game.select_answer(correct).unwrap();
            game.advance().unwrap();
        }
        assert!(api.reports().is_empty());

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        assert!(runtime.block_on(game.new_achievements()).is_empty());
        let reports = api.reports();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].is_perfect);
    }
}
