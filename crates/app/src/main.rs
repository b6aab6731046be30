use std::fmt;
use std::sync::Arc;

use services::{
    AchievementFilter, AchievementService, ActiveGame, AuthSession, Clock, GameSettings,
    HttpTriviaApi, InMemoryTriviaApi, TriviaApi, TriviaGameService,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use trivia_core::fallback::fallback_questions;
use trivia_core::model::{Category, Difficulty};
use trivia_core::{AnswerOutcome, SessionPhase, TickOutcome};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidCategory { raw: String },
    InvalidDifficulty { raw: String },
    InvalidNumber { flag: &'static str, raw: String },
    InvalidFilter { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidCategory { raw } => write!(f, "invalid --category value: {raw}"),
            ArgsError::InvalidDifficulty { raw } => {
                write!(f, "invalid --difficulty value: {raw}")
            }
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidFilter { raw } => write!(f, "invalid --filter value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app play         [--category <id>] [--difficulty <level>] [--count <n>] [--seconds <n>] [--offline]");
    eprintln!("  app achievements [--filter all|unlocked|locked] [--offline]");
    eprintln!("  app categories   [--offline]");
    eprintln!();
    eprintln!("Categories:");
    for category in Category::ALL {
        eprintln!("  {:<14} {}", category.id(), category.display_name());
    }
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TRIVIA_API_URL, TRIVIA_API_TIMEOUT_SECS, TRIVIA_USER_ID, TRIVIA_TOKEN");
    eprintln!("  TRIVIA_CATEGORY, TRIVIA_DIFFICULTY, TRIVIA_COUNT, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Achievements,
    Categories,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "achievements" => Some(Self::Achievements),
            "categories" => Some(Self::Categories),
            _ => None,
        }
    }
}

struct Args {
    settings: GameSettings,
    filter: AchievementFilter,
    offline: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut settings = GameSettings::default();
        if let Ok(raw) = std::env::var("TRIVIA_CATEGORY") {
            settings = settings.with_category(parse_category(raw)?);
        }
        if let Ok(raw) = std::env::var("TRIVIA_DIFFICULTY") {
            settings = settings.with_difficulty(parse_difficulty(raw)?);
        }
        if let Ok(raw) = std::env::var("TRIVIA_COUNT") {
            settings = settings.with_question_count(parse_number("TRIVIA_COUNT", raw)?);
        }
        let mut filter = AchievementFilter::All;
        let mut offline = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--category" => {
                    let value = require_value(args, "--category")?;
                    settings = settings.with_category(parse_category(value)?);
                }
                "--difficulty" => {
                    let value = require_value(args, "--difficulty")?;
                    settings = settings.with_difficulty(parse_difficulty(value)?);
                }
                "--count" => {
                    let value = require_value(args, "--count")?;
                    settings = settings.with_question_count(parse_number("--count", value)?);
                }
                "--seconds" => {
                    let value = require_value(args, "--seconds")?;
                    settings =
                        settings.with_seconds_per_question(parse_number("--seconds", value)?);
                }
                "--filter" => {
                    let value = require_value(args, "--filter")?;
                    filter = match value.as_str() {
                        "all" => AchievementFilter::All,
                        "unlocked" => AchievementFilter::Unlocked,
                        "locked" => AchievementFilter::Locked,
                        _ => return Err(ArgsError::InvalidFilter { raw: value }),
                    };
                }
                "--offline" => offline = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            settings,
            filter,
            offline,
        })
    }
}

fn parse_category(raw: String) -> Result<Category, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidCategory { raw })
}

fn parse_difficulty(raw: String) -> Result<Difficulty, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidDifficulty { raw })
}

fn parse_number(flag: &'static str, raw: String) -> Result<u32, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_api(offline: bool) -> Result<Arc<dyn TriviaApi>, Box<dyn std::error::Error>> {
    if offline {
        return Ok(Arc::new(
            InMemoryTriviaApi::new().with_questions(fallback_questions()),
        ));
    }
    Ok(Arc::new(HttpTriviaApi::from_env()?))
}

//
// ─── PLAY ──────────────────────────────────────────────────────────────────────
//

fn print_question(game: &ActiveGame) {
    let session = game.session();
    let Some(question) = session.current_question() else {
        return;
    };
    println!();
    println!(
        "Question {}/{}  ·  score {}  ·  lives {}  ·  streak {}",
        session.current_index() + 1,
        session.total_questions(),
        session.score(),
        "♥".repeat(usize::from(session.lives())),
        session.streak(),
    );
    println!("{}", question.prompt());
    for (i, option) in question.options().iter().enumerate() {
        println!("  {}) {option}", i + 1);
    }
    println!("Answer 1-{} ({}s)", question.options().len(), session.time_left());
}

fn print_resolution(game: &ActiveGame, outcome: &AnswerOutcome) {
    if outcome.is_timeout() {
        println!("Time's up!");
    } else if outcome.is_correct {
        println!("Correct! +{} points", outcome.points_awarded);
    } else {
        println!("Not quite.");
    }

    if outcome.ends_game() {
        return;
    }
    if let Some(question) = game.session().current_question() {
        println!("Answer: {}", question.correct_option());
        println!("{}", question.explanation());
        if !question.reference().is_empty() {
            println!("  — {}", question.reference());
        }
    }
    println!("Press Enter to continue.");
}

fn parse_choice(input: &str) -> Option<usize> {
    match input {
        "a" | "A" => Some(0),
        "b" | "B" => Some(1),
        "c" | "C" => Some(2),
        "d" | "D" => Some(3),
        other => other.parse::<usize>().ok()?.checked_sub(1),
    }
}

async fn print_game_over(game: &mut ActiveGame) {
    println!();
    println!("Game Over!");
    if let Some(summary) = game.summary() {
        println!("  Final score         {}", summary.score());
        println!(
            "  Questions answered  {} / {}",
            summary.result().questions_answered,
            summary.total_questions()
        );
        println!("  Score percentage    {}%", summary.score_percentage());
        println!("  Accuracy            {:.0}%", summary.accuracy() * 100.0);
        println!("  Streak              {}", summary.result().longest_streak);
        if summary.result().is_perfect {
            println!("  Perfect game!");
        }
    }

    let unlocked = game.new_achievements().await;
    if !unlocked.is_empty() {
        println!();
        println!("New achievements:");
        for badge in unlocked {
            println!("  {} {} — {}", badge.icon, badge.name, badge.description);
        }
    }
}

async fn play(service: &TriviaGameService, settings: GameSettings) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "Bible Trivia · {} · {}",
        settings.category.display_name(),
        settings.difficulty
    );
    let mut game = service.start_game(settings).await?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_question(&game);

    while game.phase() != SessionPhase::GameOver {
        tokio::select! {
            tick = game.next_tick(), if game.timer_armed() => match tick {
                Some(TickOutcome::Counting { time_left }) if time_left <= 5 || time_left % 10 == 0 => {
                    println!("{time_left}s left");
                }
                Some(TickOutcome::TimedOut(outcome)) => print_resolution(&game, &outcome),
                _ => {}
            },
            line = lines.next_line() => {
                let Some(line) = line? else {
                    game.reset();
                    return Ok(());
                };
                let input = line.trim();
                if input.eq_ignore_ascii_case("q") {
                    game.reset();
                    println!("Game abandoned.");
                    return Ok(());
                }
                match game.phase() {
                    SessionPhase::AwaitingAnswer => {
                        match parse_choice(input).and_then(|idx| game.select_answer(idx)) {
                            Some(outcome) => print_resolution(&game, &outcome),
                            None => println!("Pick one of the listed options."),
                        }
                    }
                    SessionPhase::ShowingExplanation => {
                        if game.advance() == Some(SessionPhase::AwaitingAnswer) {
                            print_question(&game);
                        }
                    }
                    SessionPhase::NotStarted | SessionPhase::GameOver => {}
                }
            }
        }
    }

    print_game_over(&mut game).await;
    Ok(())
}

//
// ─── ACHIEVEMENTS / CATEGORIES ─────────────────────────────────────────────────
//

async fn show_achievements(
    api: Arc<dyn TriviaApi>,
    auth: &AuthSession,
    filter: AchievementFilter,
) -> Result<(), Box<dyn std::error::Error>> {
    let overview = AchievementService::new(api).overview(auth).await?;
    println!(
        "{} of {} unlocked ({}%)",
        overview.total_unlocked,
        overview.total_badges,
        overview.completion_percentage()
    );
    if let Some(stats) = overview.stats {
        println!(
            "Games played {}  ·  total score {}  ·  best streak {}",
            stats.games_played, stats.total_score, stats.longest_streak
        );
    }
    for badge in overview.filtered(filter) {
        let state = if badge.unlocked {
            "unlocked".to_string()
        } else {
            format!("{}/{}", badge.progress, badge.max_progress)
        };
        println!("  {} {:<24} {state}", badge.icon, badge.name);
    }
    Ok(())
}

async fn show_categories(api: Arc<dyn TriviaApi>) -> Result<(), Box<dyn std::error::Error>> {
    for category in api.categories().await? {
        println!("  {:<14} {}", category.id, category.name);
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let parsed = Args::parse(&mut argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let api = build_api(parsed.offline)?;
    let auth = AuthSession::from_env();

    match cmd {
        Command::Play => {
            let service = TriviaGameService::new(Clock::system(), api, auth);
            play(&service, parsed.settings).await
        }
        Command::Achievements => show_achievements(api, &auth, parsed.filter).await,
        Command::Categories => show_categories(api).await,
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
