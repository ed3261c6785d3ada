//! Phrase normalization: arbitrary display text down to an A–Z letter sequence.
//!
//! Accented letters are decomposed and their combining marks dropped; a small
//! set of Latin letters with no canonical decomposition gets a fixed
//! length-preserving substitution so the total letter count stays stable.

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Single-letter fallbacks for Latin letters that NFKD leaves intact.
/// Length-preserving on purpose: the letter count drives grid sizing.
fn special_latin(ch: char) -> Option<char> {
    match ch {
        'ß' | 'ẞ' => Some('S'),
        'Æ' | 'æ' => Some('E'),
        'Œ' | 'œ' => Some('E'),
        'Ø' | 'ø' => Some('O'),
        'Ð' | 'ð' => Some('D'),
        'Þ' | 'þ' => Some('T'),
        'Ł' | 'ł' => Some('L'),
        'Å' | 'å' => Some('A'),
        _ => None,
    }
}

/// Normalize a display phrase to its uppercase A–Z letter sequence.
///
/// Pure function of the input: decompose (NFKD), drop combining marks, apply
/// the fixed substitution table, uppercase, keep only A–Z.
pub fn normalize_phrase(input: &str) -> String {
    input
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .map(|ch| special_latin(ch).unwrap_or(ch))
        .flat_map(|ch| ch.to_uppercase())
        .filter(|ch| ch.is_ascii_uppercase())
        .collect()
}

/// The phrase's letter multiset, consumed exactly once per physical grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LetterBudget {
    counts: [u32; 26],
    total: u32,
}

fn letter_index(ch: u8) -> usize {
    debug_assert!(ch.is_ascii_uppercase());
    (ch - b'A') as usize
}

impl LetterBudget {
    /// Build a budget from an already-normalized A–Z letter sequence.
    pub fn from_letters(letters: &str) -> Self {
        let mut budget = Self::default();
        for &b in letters.as_bytes() {
            budget.counts[letter_index(b)] += 1;
            budget.total += 1;
        }
        budget
    }

    /// Remaining count for one letter.
    pub fn count(&self, ch: u8) -> u32 {
        self.counts[letter_index(ch)]
    }

    /// Remaining letters over the whole alphabet.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// True when every letter has been consumed, no surplus and no shortfall.
    pub fn is_exhausted(&self) -> bool {
        self.total == 0
    }

    /// Consume one occurrence of a letter. Caller must have checked availability.
    pub fn take(&mut self, ch: u8) {
        let idx = letter_index(ch);
        debug_assert!(self.counts[idx] > 0, "budget underflow for {}", ch as char);
        self.counts[idx] -= 1;
        self.total -= 1;
    }

    /// Release one occurrence of a letter back to the budget.
    pub fn give(&mut self, ch: u8) {
        self.counts[letter_index(ch)] += 1;
        self.total += 1;
    }

    /// Whether the word's own letter counts each fit within this budget.
    ///
    /// Necessary but not sufficient for placement: all slots share one budget.
    pub fn fits_word(&self, word: &str) -> bool {
        let mut need = [0u32; 26];
        for &b in word.as_bytes() {
            let idx = letter_index(b);
            need[idx] += 1;
            if need[idx] > self.counts[idx] {
                return false;
            }
        }
        true
    }
}
