use std::collections::HashMap;
use std::fmt;

/// Feedback text recorded for guesses whose length differs from the secret.
pub const INVALID_LENGTH_FEEDBACK: &str = "Invalid length of characters.";

const CORRECT_POINTS: i32 = 10;
const PRESENT_POINTS: i32 = 5;
const ABSENT_POINTS: i32 = -10;
const MAX_SCORE: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterState {
    Correct,
    Present,
    Absent,
}

impl LetterState {
    /// Encodes one guessed letter the way the feedback string shows it.
    #[must_use]
    pub fn encode(self, letter: char) -> char {
        match self {
            Self::Correct => single_char_upper(letter),
            Self::Present => letter,
            Self::Absent => '?',
        }
    }
}

// Letters whose uppercase form spans several chars keep their lowercase form
// so the feedback stays one char per position.
fn single_char_upper(letter: char) -> char {
    let mut upper = letter.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(c), None) => c,
        _ => letter,
    }
}

/// Per-position result of comparing a guess to the secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    letters: Vec<char>,
    states: Vec<LetterState>,
}

impl Feedback {
    #[must_use]
    pub fn states(&self) -> &[LetterState] {
        &self.states
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[must_use]
    pub fn is_all_correct(&self) -> bool {
        !self.states.is_empty() && self.states.iter().all(|s| *s == LetterState::Correct)
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (letter, state) in self.letters.iter().zip(&self.states) {
            write!(f, "{}", state.encode(*letter))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    Scored(Feedback),
    InvalidLength { expected: usize, actual: usize },
}

impl Evaluation {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Scored(_))
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        match self {
            Self::Scored(feedback) => feedback.is_all_correct(),
            Self::InvalidLength { .. } => false,
        }
    }

    #[must_use]
    pub fn feedback_string(&self) -> String {
        match self {
            Self::Scored(feedback) => feedback.to_string(),
            Self::InvalidLength { .. } => INVALID_LENGTH_FEEDBACK.to_string(),
        }
    }

    /// Score of the encoded feedback string. Invalid guesses always score zero.
    #[must_use]
    pub fn score(&self) -> u8 {
        match self {
            Self::Scored(feedback) => score(&feedback.to_string()),
            Self::InvalidLength { .. } => 0,
        }
    }
}

/// Compares `guess` against `secret`, case-insensitively.
///
/// Exact matches are claimed first so a letter can never be credited as
/// present more often than it occurs in the secret. Empty guesses and guesses
/// of a different length yield [`Evaluation::InvalidLength`].
#[must_use]
pub fn evaluate(secret: &str, guess: &str) -> Evaluation {
    let secret: Vec<char> = secret.to_lowercase().chars().collect();
    let guess: Vec<char> = guess.to_lowercase().chars().collect();

    if guess.is_empty() || guess.len() != secret.len() {
        return Evaluation::InvalidLength {
            expected: secret.len(),
            actual: guess.len(),
        };
    }

    let mut remaining: HashMap<char, usize> = HashMap::new();
    for c in &secret {
        *remaining.entry(*c).or_insert(0) += 1;
    }

    let mut states = vec![LetterState::Absent; guess.len()];

    // First pass: exact positions
    for (i, (g, s)) in guess.iter().zip(&secret).enumerate() {
        if g == s {
            states[i] = LetterState::Correct;
            if let Some(count) = remaining.get_mut(g) {
                *count -= 1;
            }
        }
    }

    // Second pass: letters elsewhere in the secret
    for (i, g) in guess.iter().enumerate() {
        if states[i] == LetterState::Correct {
            continue;
        }
        if let Some(count) = remaining.get_mut(g)
            && *count > 0
        {
            states[i] = LetterState::Present;
            *count -= 1;
        }
    }

    Evaluation::Scored(Feedback {
        letters: guess,
        states,
    })
}

/// Scores a feedback string: +10 per uppercase, +5 per lowercase, -10 per `?`,
/// clamped to `0..=100`.
///
/// A non-empty string of only uppercase letters is a solved word and scores
/// the maximum regardless of its length.
#[must_use]
pub fn score(feedback: &str) -> u8 {
    if !feedback.is_empty() && feedback.chars().all(char::is_uppercase) {
        return clamp_score(MAX_SCORE);
    }
    let total = feedback
        .chars()
        .map(|c| {
            if c.is_uppercase() {
                CORRECT_POINTS
            } else if c.is_lowercase() {
                PRESENT_POINTS
            } else if c == '?' {
                ABSENT_POINTS
            } else {
                0
            }
        })
        .sum();
    clamp_score(total)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_score(total: i32) -> u8 {
    total.clamp(0, MAX_SCORE) as u8
}
