use crate::debug_log;
use crate::game_state::{GameInterface, GameIntro, GameSummary, TurnReport};
use crate::policy::{ConsistentGuessPolicy, GuessPolicy, RandomGuessPolicy};
use crate::session::GameStatus;
use crate::wordbank::{default_words, default_words_path, load_words_from_file};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;

pub const DEFAULT_WORD: &str = "subaru";
pub const DEFAULT_HINT: &str = "Japanese car brand.";
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyKind {
    /// Random unused word from the list
    Random,
    /// Random word that fits all feedback so far
    Consistent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DriverKind {
    /// Render, encode and guess directly against the session
    Loop,
    /// Play through the guess/hint/show_board_image tool calls
    Tools,
}

/// LeWord: an agent playing a Wordle-style guessing game
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Secret word
    #[arg(short, long, default_value = DEFAULT_WORD)]
    pub word: String,

    /// Hint shown to the player
    #[arg(long, default_value = DEFAULT_HINT)]
    pub hint: String,

    /// Number of guesses allowed
    #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    /// Path to a newline-delimited word list
    #[arg(short = 'i', long = "input")]
    pub words_path: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = PolicyKind::Random)]
    pub policy: PolicyKind,

    #[arg(long, value_enum, default_value_t = DriverKind::Loop)]
    pub driver: DriverKind,

    /// Seed for reproducible guesses
    #[arg(long)]
    pub seed: Option<u64>,

    /// Show the board in a terminal UI
    #[arg(long)]
    pub tui: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Explicit path first, then the per-user word list if present, then the built-in list.
pub fn resolve_words(cli: &Cli) -> io::Result<Vec<String>> {
    if let Some(path) = &cli.words_path {
        return load_words_from_file(path);
    }
    if let Some(path) = default_words_path()
        && path.is_file()
    {
        debug_log!("loading word list from {}", path.display());
        return load_words_from_file(path);
    }
    Ok(default_words())
}

#[must_use]
pub fn build_policy(kind: PolicyKind, words: Vec<String>, seed: Option<u64>) -> Box<dyn GuessPolicy> {
    match (kind, seed) {
        (PolicyKind::Random, Some(seed)) => Box::new(RandomGuessPolicy::with_seed(words, seed)),
        (PolicyKind::Random, None) => Box::new(RandomGuessPolicy::new(words)),
        (PolicyKind::Consistent, Some(seed)) => {
            Box::new(ConsistentGuessPolicy::with_seed(words, seed))
        }
        (PolicyKind::Consistent, None) => Box::new(ConsistentGuessPolicy::new(words)),
    }
}

#[must_use]
pub fn outcome_line(summary: &GameSummary) -> String {
    match summary.status {
        GameStatus::Won => format!(
            "Correct word guessed in {} attempts! Final score: {}",
            summary.attempts.len(),
            summary.final_score
        ),
        GameStatus::Lost => format!(
            "Max attempts reached. The word was '{}'. Final score: {}",
            summary.secret, summary.final_score
        ),
        GameStatus::InProgress => format!(
            "Game stopped after {} attempts.",
            summary.attempts.len()
        ),
    }
}

/// Line-oriented front-end writing to any `Write`.
pub struct CliInterface<W: Write> {
    out: W,
}

impl<W: Write> CliInterface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}") {
            debug_log!("CliInterface::emit() - write failed: {}", e);
        }
    }
}

impl<W: Write> GameInterface for CliInterface<W> {
    fn display_intro(&mut self, intro: &GameIntro) {
        self.emit(&format!(
            "LeWord: {} letters, {} attempts. Hint: {}",
            intro.word_length, intro.max_attempts, intro.hint
        ));
    }

    fn display_turn(&mut self, turn: &TurnReport) {
        self.emit(&format!("Turn {}", turn.turn));
        self.emit(&format!(
            "Guess: {}, Feedback: {} (score {}, correct {}), {} attempts left",
            turn.attempt.guess(),
            turn.attempt.feedback(),
            turn.attempt.score(),
            turn.attempt.is_correct(),
            turn.attempts_left
        ));
        self.emit(turn.board.to_string().trim_end_matches('\n'));
    }

    fn display_game_over(&mut self, summary: &GameSummary) {
        self.emit(&outcome_line(summary));
    }
}
