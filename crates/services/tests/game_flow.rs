use std::sync::Arc;
use std::time::Duration;

use services::{
    ApiConfig, AuthSession, Clock, GameSettings, HttpTriviaApi, InMemoryTriviaApi,
    QuestionService, QuestionSource, TriviaGameService,
};
use trivia_core::model::{Achievement, Category, Difficulty, Question, QuestionDraft, QuestionId};
use trivia_core::time::fixed_now;
use trivia_core::{SessionPhase, TickOutcome};

fn question(id: usize, difficulty: Difficulty) -> Question {
    QuestionDraft {
        id: QuestionId::new(format!("q{id}")),
        prompt: format!("Question {id}?"),
        options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
        correct_index: id % 4,
        explanation: "See the reference.".into(),
        reference: "Psalm 119:105".into(),
        difficulty,
    }
    .validate()
    .unwrap()
}

fn bank(n: usize, difficulty: Difficulty) -> Vec<Question> {
    (0..n).map(|i| question(i, difficulty)).collect()
}

fn badge(id: &str) -> Achievement {
    serde_json::from_value(serde_json::json!({ "id": id, "name": "Perfect Round" })).unwrap()
}

fn service(api: &InMemoryTriviaApi) -> TriviaGameService {
    TriviaGameService::new(
        Clock::fixed(fixed_now()),
        Arc::new(api.clone()),
        AuthSession::new("user-1", "token-1"),
    )
}

#[tokio::test]
async fn perfect_game_is_reported_and_unlocks_badges() {
    let api = InMemoryTriviaApi::new().with_questions(bank(10, Difficulty::Easy));
    api.unlock_on_next_report(vec![badge("perfect-round")]);

    let mut game = service(&api)
        .start_game(GameSettings::default().with_difficulty(Difficulty::Easy))
        .await
        .unwrap();
    assert_eq!(game.source(), QuestionSource::Generated);

    while game.phase() != SessionPhase::GameOver {
        let correct = game.session().current_question().unwrap().correct_index();
        game.select_answer(correct).unwrap();
        game.advance().unwrap();
    }

    let unlocked = game.new_achievements().await;
    assert_eq!(unlocked.len(), 1);
    assert_eq!(unlocked[0].id, "perfect-round");

    let reports = api.reports();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].is_perfect);
    assert_eq!(reports[0].questions_answered, 10);
    assert_eq!(reports[0].correct_answers, 10);
    assert_eq!(reports[0].longest_streak, 10);

    let summary = game.summary().unwrap();
    assert_eq!(summary.score(), reports[0].score);
}

#[tokio::test]
async fn losing_all_lives_reports_without_explanation() {
    let api = InMemoryTriviaApi::new().with_questions(bank(10, Difficulty::Medium));
    let mut game = service(&api).start_game(GameSettings::default()).await.unwrap();

    for round in 0..3 {
        let wrong = (game.session().current_question().unwrap().correct_index() + 1) % 4;
        let outcome = game.select_answer(wrong).unwrap();
        if round < 2 {
            assert_eq!(outcome.phase, SessionPhase::ShowingExplanation);
            game.advance().unwrap();
        } else {
            assert!(outcome.ends_game());
        }
    }

    assert_eq!(game.phase(), SessionPhase::GameOver);
    assert!(!game.timer_armed());
    assert!(game.new_achievements().await.is_empty());

    let reports = api.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].score, 0);
    assert_eq!(reports[0].questions_answered, 3);
    assert!(!reports[0].is_perfect);
}

#[tokio::test(start_paused = true)]
async fn countdown_times_out_exactly_once() {
    let api = InMemoryTriviaApi::new().with_questions(bank(3, Difficulty::Easy));
    let mut game = service(&api).start_game(GameSettings::default()).await.unwrap();
    let started = tokio::time::Instant::now();

    let mut timeouts = 0;
    while game.timer_armed() {
        if let Some(TickOutcome::TimedOut(outcome)) = game.next_tick().await {
            assert!(outcome.is_timeout());
            timeouts += 1;
        }
    }

    assert_eq!(timeouts, 1);
    assert_eq!(started.elapsed(), Duration::from_secs(30));
    assert_eq!(game.session().lives(), 2);
    assert_eq!(game.session().streak(), 0);
    assert_eq!(game.phase(), SessionPhase::ShowingExplanation);
    assert!(game.next_tick().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn short_countdown_setting_is_honored() {
    let api = InMemoryTriviaApi::new().with_questions(bank(2, Difficulty::Easy));
    let mut game = service(&api)
        .start_game(GameSettings::default().with_seconds_per_question(5))
        .await
        .unwrap();
    let started = tokio::time::Instant::now();

    while game.timer_armed() {
        game.next_tick().await;
    }

    assert_eq!(started.elapsed(), Duration::from_secs(5));
    assert_eq!(game.session().time_left(), 0);
}

#[tokio::test]
async fn failed_stats_report_does_not_block_game_over() {
    let api = InMemoryTriviaApi::new().with_questions(bank(1, Difficulty::Hard));
    api.set_fail_stats(true);
    let mut game = service(&api).start_game(GameSettings::default()).await.unwrap();

    let correct = game.session().current_question().unwrap().correct_index();
    game.select_answer(correct).unwrap();
    assert_eq!(game.advance(), Some(SessionPhase::GameOver));

    assert!(game.new_achievements().await.is_empty());
    assert!(api.reports().is_empty());
    assert_eq!(game.summary().unwrap().score(), 30);
}

#[tokio::test]
async fn generator_outage_starts_with_fallback_questions() {
    let api = InMemoryTriviaApi::new().with_questions(bank(10, Difficulty::Hard));
    api.set_fail_questions(true);

    let game = service(&api)
        .start_game(GameSettings::default().with_category(Category::Miracles))
        .await
        .unwrap();

    assert_eq!(game.source(), QuestionSource::Fallback);
    assert_eq!(game.session().total_questions(), 5);
    assert_eq!(game.phase(), SessionPhase::AwaitingAnswer);
}

#[tokio::test]
async fn unreachable_backend_falls_back() {
    let config = ApiConfig::new("http://127.0.0.1:9/api").with_timeout(Duration::from_secs(2));
    let api = HttpTriviaApi::new(config).unwrap();
    let questions = QuestionService::new(Arc::new(api));

    let set = questions.fetch(Category::All, Difficulty::Easy, 10).await;

    assert_eq!(set.source, QuestionSource::Fallback);
    assert_eq!(set.questions.len(), 5);
}
