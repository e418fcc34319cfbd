use crate::scorer::{Evaluation, evaluate};
use chrono::{DateTime, Local};

const FINAL_SCORE_PENALTY: usize = 10;

/// One recorded guess. Created by [`Session::guess`] and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    guess: String,
    feedback: String,
    score: u8,
    correct: bool,
    valid: bool,
}

impl Attempt {
    fn from_evaluation(guess: String, evaluation: &Evaluation) -> Self {
        Self {
            guess,
            feedback: evaluation.feedback_string(),
            score: evaluation.score(),
            correct: evaluation.is_correct(),
            valid: evaluation.is_valid(),
        }
    }

    #[must_use]
    pub fn guess(&self) -> &str {
        &self.guess
    }

    #[must_use]
    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    #[must_use]
    pub fn score(&self) -> u8 {
        self.score
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.correct
    }

    /// False when the guess length did not match the secret.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

/// Prior attempt as handed to guess policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptView {
    pub guess: String,
    pub feedback: String,
    pub correct: bool,
}

/// Read-only snapshot of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameView {
    pub attempts: Vec<AttemptView>,
    pub attempts_left: usize,
    pub word_length: usize,
}

impl GameView {
    #[must_use]
    pub fn has_guessed(&self, word: &str) -> bool {
        self.attempts.iter().any(|a| a.guess == word)
    }
}

/// A single LeWord game.
///
/// Callers must stop calling [`Session::guess`] once [`Session::is_over`]
/// returns true. The session still records such guesses, so the attempt
/// history can then grow beyond [`Session::max_attempts`].
#[derive(Debug, Clone)]
pub struct Session {
    secret: String,
    hint: String,
    word_length: usize,
    max_attempts: usize,
    attempts: Vec<Attempt>,
    started_at: DateTime<Local>,
}

impl Session {
    pub fn new(secret: &str, hint: &str, max_attempts: usize) -> Self {
        let secret = secret.to_lowercase();
        Self {
            word_length: secret.chars().count(),
            secret,
            hint: hint.to_string(),
            max_attempts,
            attempts: Vec::new(),
            started_at: Local::now(),
        }
    }

    /// Scores `text` against the secret and appends the attempt.
    ///
    /// Never rejects input: invalid-length guesses are recorded with score 0
    /// and consume an attempt like any other guess.
    pub fn guess(&mut self, text: &str) -> &Attempt {
        if self.is_over() {
            log::warn!(
                "guess '{}' submitted after game over ({} of {} attempts used)",
                text,
                self.attempts.len(),
                self.max_attempts
            );
        }
        let guess = text.to_lowercase();
        let evaluation = evaluate(&self.secret, &guess);
        let attempt = Attempt::from_evaluation(guess, &evaluation);
        log::debug!(
            "attempt {}: '{}' -> '{}' (score {})",
            self.attempts.len() + 1,
            attempt.guess,
            attempt.feedback,
            attempt.score
        );
        self.attempts.push(attempt);
        &self.attempts[self.attempts.len() - 1]
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.attempts.len() >= self.max_attempts
            || self.last_attempt().is_some_and(Attempt::is_correct)
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        if self.last_attempt().is_some_and(Attempt::is_correct) {
            GameStatus::Won
        } else if self.attempts.len() >= self.max_attempts {
            GameStatus::Lost
        } else {
            GameStatus::InProgress
        }
    }

    /// Game-level score: 100 minus 10 per attempt made, floored at 0.
    #[must_use]
    pub fn final_score(&self) -> usize {
        100usize.saturating_sub(FINAL_SCORE_PENALTY * self.attempts.len())
    }

    #[must_use]
    pub fn hint(&self) -> &str {
        &self.hint
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    #[must_use]
    pub fn word_length(&self) -> usize {
        self.word_length
    }

    #[must_use]
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    #[must_use]
    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    #[must_use]
    pub fn last_attempt(&self) -> Option<&Attempt> {
        self.attempts.last()
    }

    #[must_use]
    pub fn attempts_left(&self) -> usize {
        self.max_attempts.saturating_sub(self.attempts.len())
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    #[must_use]
    pub fn feedback_history(&self) -> Vec<&str> {
        self.attempts.iter().map(Attempt::feedback).collect()
    }

    /// `(guess, feedback)` pairs in attempt order.
    #[must_use]
    pub fn state(&self) -> Vec<(&str, &str)> {
        self.attempts
            .iter()
            .map(|a| (a.guess(), a.feedback()))
            .collect()
    }

    #[must_use]
    pub fn view(&self) -> GameView {
        GameView {
            attempts: self
                .attempts
                .iter()
                .map(|a| AttemptView {
                    guess: a.guess.clone(),
                    feedback: a.feedback.clone(),
                    correct: a.correct,
                })
                .collect(),
            attempts_left: self.attempts_left(),
            word_length: self.word_length,
        }
    }

    /// Starts a new game with the same attempt budget.
    pub fn reset(&mut self, secret: &str, hint: &str) {
        *self = Self::new(secret, hint, self.max_attempts);
    }

    /// Player-facing rules, used as the chat agent's system prompt.
    #[must_use]
    pub fn instructions(&self) -> String {
        let n = self.word_length;
        format!(
            "Let's play a word-guessing game called LeWord!
I will give you a hint, and you have to guess the secret word.

IMPORTANT:
- You must guess words that are EXACTLY {n} letters long.
- Any guess shorter or longer than {n} letters will be rejected, and you will lose an attempt.

You have {max} attempts to guess the correct word.

After each guess, you will receive feedback using a string of {n} characters:
- An uppercase letter means that letter is correct and in the correct position.
- A lowercase letter means that letter is in the word but in the wrong position.
- A '?' means the letter is not in the word at all.

If the secret word is \"grape\" and you guess \"apple\", the feedback would be \"ap??E\" because:
- 'a' and the first 'p' are in the word but not in those positions.
- The second 'p' does not appear twice in the word, so it gets a '?'.
- 'l' is not in the word, so it gets a '?'.
- 'E' is in the correct position.

If you receive the feedback \"{invalid}\", your guess had the wrong length.

Each guess receives a score between 0 and 100. A higher score means your guess is closer to the word.

Here's your hint: {hint}.",
            max = self.max_attempts,
            invalid = crate::scorer::INVALID_LENGTH_FEEDBACK,
            hint = self.hint,
        )
    }

    #[must_use]
    pub fn tips(&self) -> &'static str {
        "You can use the following tools:
- 'guess' to make a guess
- 'hint' to ask for the hint
- 'show_board_image' to see the current board"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::INVALID_LENGTH_FEEDBACK;

    fn session() -> Session {
        Session::new("Subaru", "Japanese car brand.", 10)
    }

    #[test]
    fn test_new_session_normalizes_secret() {
        let s = session();
        assert_eq!(s.secret(), "subaru");
        assert_eq!(s.word_length(), 6);
        assert_eq!(s.hint(), "Japanese car brand.");
        assert_eq!(s.status(), GameStatus::InProgress);
        assert!(!s.is_over());
        assert_eq!(s.final_score(), 100);
    }

    #[test]
    fn test_winning_guess() {
        let mut s = session();
        let attempt = s.guess("SUBARU").clone();
        assert_eq!(attempt.guess(), "subaru");
        assert_eq!(attempt.feedback(), "SUBARU");
        assert_eq!(attempt.score(), 100);
        assert!(attempt.is_correct());
        assert!(s.is_over());
        assert_eq!(s.status(), GameStatus::Won);
        assert_eq!(s.final_score(), 90);
    }

    #[test]
    fn test_attempt_score_follows_feedback_string() {
        let mut s = Session::new("ab1", "", 6);
        let attempt = s.guess("ab1").clone();
        assert_eq!(attempt.feedback(), "AB1");
        assert!(attempt.is_correct());
        assert_eq!(attempt.score(), crate::scorer::score(attempt.feedback()));

        let mut s = Session::new("honda", "", 6);
        assert_eq!(s.guess("honda").score(), 100);
    }

    #[test]
    fn test_invalid_length_consumes_attempt() {
        let mut s = session();
        let attempt = s.guess("subar").clone();
        assert_eq!(attempt.feedback(), INVALID_LENGTH_FEEDBACK);
        assert_eq!(attempt.score(), 0);
        assert!(!attempt.is_correct());
        assert!(!attempt.is_valid());
        assert_eq!(s.attempts().len(), 1);
        assert_eq!(s.attempts_left(), 9);
    }

    #[test]
    fn test_truncated_secret_prefix_is_not_correct() {
        let mut s = session();
        assert!(!s.guess("subarus").is_correct());
        assert!(!s.guess("").is_correct());
        assert_eq!(s.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_loses_after_budget() {
        let mut s = Session::new("honda", "", 3);
        for _ in 0..2 {
            s.guess("hello");
            assert!(!s.is_over());
        }
        s.guess("mazda");
        assert!(s.is_over());
        assert_eq!(s.status(), GameStatus::Lost);
        assert_eq!(s.final_score(), 70);
    }

    #[test]
    fn test_final_score_floors_at_zero() {
        let mut s = Session::new("honda", "", 12);
        for n in 1..=12 {
            s.guess("lexus");
            assert_eq!(s.final_score(), 100usize.saturating_sub(10 * n));
        }
        assert_eq!(s.final_score(), 0);
    }

    #[test]
    fn test_guess_after_game_over_is_still_recorded() {
        let mut s = Session::new("honda", "", 1);
        s.guess("honda");
        assert!(s.is_over());
        s.guess("mazda");
        assert_eq!(s.attempts().len(), 2);
        // The latest guess decides the outcome.
        assert_eq!(s.status(), GameStatus::Lost);
    }

    #[test]
    fn test_repeated_guesses_are_not_deduplicated() {
        let mut s = session();
        s.guess("toyota");
        s.guess("toyota");
        assert_eq!(s.attempts().len(), 2);
    }

    #[test]
    fn test_view_and_history() {
        let mut s = Session::new("grape", "fruit", 6);
        s.guess("apple");
        s.guess("kiwi");
        let view = s.view();
        assert_eq!(view.word_length, 5);
        assert_eq!(view.attempts_left, 4);
        assert_eq!(view.attempts[0].feedback, "ap??E");
        assert!(view.has_guessed("kiwi"));
        assert_eq!(s.feedback_history(), vec!["ap??E", INVALID_LENGTH_FEEDBACK]);
        assert_eq!(s.state()[0], ("apple", "ap??E"));
    }

    #[test]
    fn test_reset_keeps_budget() {
        let mut s = session();
        s.guess("subaru");
        s.reset("Honda", "Another brand.");
        assert!(s.attempts().is_empty());
        assert_eq!(s.secret(), "honda");
        assert_eq!(s.max_attempts(), 10);
        assert_eq!(s.word_length(), 5);
    }

    #[test]
    fn test_instructions_mention_length_and_hint() {
        let s = session();
        let text = s.instructions();
        assert!(text.contains("EXACTLY 6 letters"));
        assert!(text.contains("10 attempts"));
        assert!(text.contains("Japanese car brand."));
        assert!(s.tips().contains("show_board_image"));
    }
}
