//! Guess selection.
//!
//! Policies see an [`Observation`] and return the next word to play. The
//! session never depends on how that word was chosen.

use crate::scorer::evaluate;
use crate::session::GameView;
use crate::vision::Embedding;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Everything a policy may look at before guessing.
#[derive(Debug, Clone)]
pub struct Observation {
    pub view: GameView,
    pub embedding: Embedding,
}

pub trait GuessPolicy {
    fn decide_next_guess(&mut self, observation: &Observation) -> String;
}

impl<P: GuessPolicy + ?Sized> GuessPolicy for Box<P> {
    fn decide_next_guess(&mut self, observation: &Observation) -> String {
        (**self).decide_next_guess(observation)
    }
}

/// Picks uniformly among words not guessed yet.
///
/// Once every word has been tried it keeps returning the first word.
pub struct RandomGuessPolicy {
    words: Vec<String>,
    rng: StdRng,
}

impl RandomGuessPolicy {
    pub fn new(words: Vec<String>) -> Self {
        Self {
            words,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(words: Vec<String>, seed: u64) -> Self {
        Self {
            words,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn fallback(&self) -> String {
        self.words.first().cloned().unwrap_or_default()
    }
}

impl GuessPolicy for RandomGuessPolicy {
    fn decide_next_guess(&mut self, observation: &Observation) -> String {
        let remaining: Vec<&String> = self
            .words
            .iter()
            .filter(|w| !observation.view.has_guessed(w))
            .collect();
        match remaining.choose(&mut self.rng) {
            Some(word) => (*word).clone(),
            None => self.fallback(),
        }
    }
}

/// Only proposes words that agree with every valid piece of feedback so far.
///
/// Falls back to [`RandomGuessPolicy`] behaviour when nothing in the list fits.
pub struct ConsistentGuessPolicy {
    inner: RandomGuessPolicy,
}

impl ConsistentGuessPolicy {
    pub fn new(words: Vec<String>) -> Self {
        Self {
            inner: RandomGuessPolicy::new(words),
        }
    }

    pub fn with_seed(words: Vec<String>, seed: u64) -> Self {
        Self {
            inner: RandomGuessPolicy::with_seed(words, seed),
        }
    }
}

/// Words of the right length that would have produced exactly the recorded
/// feedback for every valid attempt, excluding words already guessed.
#[must_use]
pub fn consistent_candidates<'a>(words: &'a [String], view: &GameView) -> Vec<&'a String> {
    words
        .iter()
        .filter(|w| w.chars().count() == view.word_length && !view.has_guessed(w))
        .filter(|w| {
            view.attempts.iter().all(|a| {
                let eval = evaluate(w, &a.guess);
                !eval.is_valid() || eval.feedback_string() == a.feedback
            })
        })
        .collect()
}

impl GuessPolicy for ConsistentGuessPolicy {
    fn decide_next_guess(&mut self, observation: &Observation) -> String {
        let choice = {
            let candidates = consistent_candidates(&self.inner.words, &observation.view);
            crate::debug_log!("{} consistent candidates", candidates.len());
            candidates
                .choose(&mut self.inner.rng)
                .map(|word| (*word).clone())
        };
        choice.unwrap_or_else(|| self.inner.decide_next_guess(observation))
    }
}
