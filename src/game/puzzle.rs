//! Letter-reveal puzzle over the fixed phrase.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, instrument};

/// The phrase the player has to uncover.
pub const TARGET_PHRASE: &str = "SENI SEVIYORUM";

/// Indices shown before the first reveal (both `S` letters).
pub const INITIAL_REVEALED: [usize; 2] = [0, 5];

/// Placeholder for a letter that is still hidden.
pub const HIDDEN_GLYPH: char = '_';

/// Result of asking for one more letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// A letter was revealed and others remain hidden.
    Revealed(usize),
    /// The last hidden letter was revealed.
    Completed(usize),
    /// Nothing left to reveal; nothing changed.
    AlreadyComplete,
}

/// Set of revealed phrase positions.
///
/// Only ever grows between resets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealSet {
    revealed: BTreeSet<usize>,
}

impl RevealSet {
    /// Creates the initial set with the two pre-shown letters.
    pub fn new() -> Self {
        Self {
            revealed: INITIAL_REVEALED.into_iter().collect(),
        }
    }

    /// Returns true if the index is revealed.
    pub fn contains(&self, index: usize) -> bool {
        self.revealed.contains(&index)
    }

    /// Number of revealed indices.
    pub fn len(&self) -> usize {
        self.revealed.len()
    }

    /// Always false: the initial letters are never removed.
    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty()
    }

    /// Iterates revealed indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.revealed.iter().copied()
    }

    /// Non-space indices not yet revealed.
    pub fn hidden(&self) -> Vec<usize> {
        letter_indices().filter(|i| !self.contains(*i)).collect()
    }

    /// True once every non-space index is revealed.
    pub fn is_complete(&self) -> bool {
        letter_indices().all(|i| self.contains(i))
    }

    /// Reveals one hidden letter chosen uniformly at random.
    #[instrument(skip(self, rng), fields(revealed = self.len()))]
    pub fn reveal<R: Rng>(&mut self, rng: &mut R) -> RevealOutcome {
        let hidden = self.hidden();
        let Some(&index) = hidden.choose(rng) else {
            debug!("No hidden letters left");
            return RevealOutcome::AlreadyComplete;
        };

        self.revealed.insert(index);
        debug!(index, remaining = hidden.len() - 1, "Revealed letter");

        if self.is_complete() {
            RevealOutcome::Completed(index)
        } else {
            RevealOutcome::Revealed(index)
        }
    }

    /// Renders the phrase with hidden letters replaced by `_`.
    pub fn display(&self) -> String {
        TARGET_PHRASE
            .chars()
            .enumerate()
            .map(|(i, c)| {
                if c == ' ' || self.contains(i) {
                    c
                } else {
                    HIDDEN_GLYPH
                }
            })
            .collect()
    }
}

impl Default for RevealSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Indices of the phrase that hold letters.
pub fn letter_indices() -> impl Iterator<Item = usize> {
    TARGET_PHRASE
        .chars()
        .enumerate()
        .filter(|(_, c)| *c != ' ')
        .map(|(i, _)| i)
}

/// Number of letters in the phrase.
pub fn letter_count() -> usize {
    letter_indices().count()
}

/// Case-folds and drops whitespace.
///
/// Turkish `İ` and `ı` fold onto `i` so a Turkish keyboard answer matches.
fn normalize(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        match c {
            'İ' | 'I' | 'ı' => folded.push('i'),
            other => folded.extend(other.to_lowercase()),
        }
    }
    folded
}

/// Returns true if the guess contains the phrase, ignoring case and whitespace.
#[instrument]
pub fn matches_phrase(guess: &str) -> bool {
    normalize(guess).contains(&normalize(TARGET_PHRASE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_phrase_shape() {
        assert_eq!(TARGET_PHRASE.chars().count(), 14);
        assert_eq!(letter_count(), 13);
    }

    #[test]
    fn test_initial_display() {
        let set = RevealSet::new();
        assert_eq!(set.display(), "S___ S________");
        assert_eq!(set.len(), 2);
        assert!(!set.is_complete());
    }

    #[test]
    fn test_reveal_until_complete() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut set = RevealSet::new();

        for step in 0..letter_count() - INITIAL_REVEALED.len() - 1 {
            assert!(matches!(set.reveal(&mut rng), RevealOutcome::Revealed(_)), "step {step}");
        }
        assert!(matches!(set.reveal(&mut rng), RevealOutcome::Completed(_)));
        assert_eq!(set.display(), TARGET_PHRASE);
        assert_eq!(set.reveal(&mut rng), RevealOutcome::AlreadyComplete);
        assert_eq!(set.len(), letter_count());
    }

    #[test]
    fn test_reveal_never_picks_space() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut set = RevealSet::new();
        while set.reveal(&mut rng) != RevealOutcome::AlreadyComplete {}
        assert!(!set.contains(4));
    }

    #[test]
    fn test_guess_predicate() {
        assert!(matches_phrase("seni seviyorum"));
        assert!(matches_phrase("SeniSeviyorum"));
        assert!(matches_phrase(" seni   seviyorum "));
        assert!(matches_phrase("ben de seni seviyorum!"));
        assert!(matches_phrase("SENİ SEVİYORUM"));
        assert!(matches_phrase("senı sevıyorum"));
        assert!(!matches_phrase("seviyorum seni"));
        assert!(!matches_phrase("seviyorum"));
    }
}
