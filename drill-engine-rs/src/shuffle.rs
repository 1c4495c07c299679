//! Display-order randomization and the reconciliation back to canonical order.
//!
//! Content always declares its options, items, and pairs in canonical order.
//! What the learner sees is a shuffled view, so every answer the learner gives
//! arrives in display coordinates and has to be mapped back before scoring.
//! [`Permutation`] keeps both directions of that mapping.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// A bijection between display positions and canonical indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation {
    /// `display_to_canonical[j]` is the canonical index shown at position `j`.
    display_to_canonical: Vec<usize>,
    /// `canonical_to_display[k]` is where canonical index `k` ended up.
    canonical_to_display: Vec<usize>,
}

impl Permutation {
    pub fn identity(len: usize) -> Self {
        Self::from_display_order((0..len).collect())
    }

    fn from_display_order(display_to_canonical: Vec<usize>) -> Self {
        let mut canonical_to_display = vec![0; display_to_canonical.len()];
        for (display, &canonical) in display_to_canonical.iter().enumerate() {
            canonical_to_display[canonical] = display;
        }
        Self {
            display_to_canonical,
            canonical_to_display,
        }
    }

    pub fn len(&self) -> usize {
        self.display_to_canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.display_to_canonical.is_empty()
    }

    /// Canonical index of the entry shown at `display_index`.
    pub fn canonical_at(&self, display_index: usize) -> Option<usize> {
        self.display_to_canonical.get(display_index).copied()
    }

    /// Display position where canonical index `canonical` is shown.
    pub fn display_of(&self, canonical: usize) -> Option<usize> {
        self.canonical_to_display.get(canonical).copied()
    }

    /// The full display order as canonical indices.
    pub fn display_order(&self) -> &[usize] {
        &self.display_to_canonical
    }

    /// Reorders canonical-ordered `items` into display order.
    pub fn apply<'a, T>(&self, items: &'a [T]) -> Vec<&'a T> {
        self.display_to_canonical
            .iter()
            .filter_map(|&canonical| items.get(canonical))
            .collect()
    }
}

/// Source of fresh permutations. One per session: unseeded sessions draw from
/// entropy, seeded sessions replay the same display orders (tests rely on
/// this).
#[derive(Debug)]
pub struct Shuffler {
    rng: SmallRng,
}

impl Shuffler {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Uniform permutation of `0..len` (Fisher–Yates via `SliceRandom`).
    pub fn permutation(&mut self, len: usize) -> Permutation {
        let mut display_to_canonical: Vec<usize> = (0..len).collect();
        display_to_canonical.shuffle(&mut self.rng);
        Permutation::from_display_order(display_to_canonical)
    }

    /// Scrambles the letters of `word` for display. Redraws when the shuffle
    /// reproduces the solution, so the learner is not handed the answer;
    /// bounded, because words like "aa" have no distinct arrangement.
    pub fn scramble(&mut self, word: &str) -> String {
        let letters: Vec<char> = word.chars().collect();
        if letters.len() < 2 {
            return word.to_string();
        }
        let mut scrambled = letters.clone();
        for _ in 0..8 {
            scrambled.shuffle(&mut self.rng);
            if scrambled != letters {
                break;
            }
        }
        scrambled.into_iter().collect()
    }
}

impl Default for Shuffler {
    fn default() -> Self {
        Self::new()
    }
}
