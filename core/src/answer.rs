use serde::{Deserialize, Serialize};

use crate::{GameError, Result};

/// Characters that never require a tile and are skipped transparently.
pub(crate) fn is_separator(c: char) -> bool {
    !c.is_alphanumeric()
}

/// Tracks progress through one question's answer text.
///
/// The cursor always points at the next required (non-separator) character,
/// or past the end once the answer is fully consumed. It never regresses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnswerTracker {
    letters: Vec<char>,
    cursor: usize,
    eaten: Vec<char>,
}

impl AnswerTracker {
    /// Matching is case-insensitive, so the answer is stored lowercased.
    pub fn new(answer: &str) -> Result<Self> {
        let letters: Vec<char> = answer.chars().flat_map(char::to_lowercase).collect();

        if letters.iter().all(|&c| is_separator(c)) {
            return Err(GameError::InvalidQuestion);
        }

        let mut tracker = Self {
            letters,
            cursor: 0,
            eaten: Vec::new(),
        };
        tracker.skip_separators();
        Ok(tracker)
    }

    fn skip_separators(&mut self) {
        while self
            .letters
            .get(self.cursor)
            .is_some_and(|&c| is_separator(c))
        {
            self.cursor += 1;
        }
    }

    /// The letter the player must capture next, or `None` when complete.
    pub fn next_required(&self) -> Option<char> {
        self.letters.get(self.cursor).copied()
    }

    /// Moves past the current required letter, skipping any separators that
    /// follow it. No-op when nothing is pending.
    pub fn advance(&mut self) {
        if let Some(letter) = self.next_required() {
            self.eaten.push(letter);
            self.cursor += 1;
            self.skip_separators();
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.letters.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Letters already captured, in order, for display against the snake body.
    pub fn eaten(&self) -> &[char] {
        &self.eaten
    }

    pub fn required_total(&self) -> usize {
        self.letters.iter().filter(|&&c| !is_separator(c)).count()
    }

    /// Fraction of required letters already captured, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.eaten.len() as f32 / self.required_total() as f32
    }
}
