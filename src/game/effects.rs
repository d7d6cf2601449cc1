//! Decorative particles for the celebration card.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

/// Number of floating hearts generated on acceptance.
pub const HEART_COUNT: usize = 20;

/// Number of confetti pieces generated on acceptance.
pub const CONFETTI_COUNT: usize = 50;

/// Upper bound (exclusive) of the animation delay, in seconds.
pub const MAX_DELAY_SECS: f64 = 2.0;

/// One of the five "yes" buttons on the proposal card.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
pub enum PositiveAnswer {
    /// "Evet isterim! ❤️"
    EvetIsterim,
    /// "Evet çok isterim! 💕"
    EvetCokIsterim,
    /// "Tabii ki evet! 🥰"
    TabiiKiEvet,
    /// "Elbette sevgilim! 💖"
    ElbetteSevgilim,
    /// "Çok isterim aşkım! 💗"
    CokIsterimAskim,
}

impl PositiveAnswer {
    /// Button caption.
    pub fn label(self) -> &'static str {
        match self {
            Self::EvetIsterim => "Evet isterim! ❤️",
            Self::EvetCokIsterim => "Evet çok isterim! 💕",
            Self::TabiiKiEvet => "Tabii ki evet! 🥰",
            Self::ElbetteSevgilim => "Elbette sevgilim! 💖",
            Self::CokIsterimAskim => "Çok isterim aşkım! 💗",
        }
    }
}

/// A button press on the proposal card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalAnswer {
    /// Any of the positive buttons.
    Yes(PositiveAnswer),
    /// The "Hayır" button.
    No,
}

impl ProposalAnswer {
    /// Caption of the negative button.
    pub const NO_LABEL: &'static str = "Hayır";

    /// All buttons in display order, positives first.
    pub fn all() -> Vec<ProposalAnswer> {
        PositiveAnswer::iter()
            .map(ProposalAnswer::Yes)
            .chain(std::iter::once(ProposalAnswer::No))
            .collect()
    }

    /// Button caption.
    pub fn label(self) -> &'static str {
        match self {
            Self::Yes(answer) => answer.label(),
            Self::No => Self::NO_LABEL,
        }
    }
}

/// Fixed confetti palette.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
pub enum ConfettiColor {
    /// `#ff69b4`
    HotPink,
    /// `#ffc0cb`
    Pink,
    /// `#ffb6c1`
    LightPink,
    /// `#ff1493`
    DeepPink,
    /// `#dda0dd`
    Plum,
}

impl ConfettiColor {
    /// CSS hex code.
    pub fn hex(self) -> &'static str {
        match self {
            Self::HotPink => "#ff69b4",
            Self::Pink => "#ffc0cb",
            Self::LightPink => "#ffb6c1",
            Self::DeepPink => "#ff1493",
            Self::Plum => "#dda0dd",
        }
    }

    /// RGB components.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::HotPink => (0xff, 0x69, 0xb4),
            Self::Pink => (0xff, 0xc0, 0xcb),
            Self::LightPink => (0xff, 0xb6, 0xc1),
            Self::DeepPink => (0xff, 0x14, 0x93),
            Self::Plum => (0xdd, 0xa0, 0xdd),
        }
    }
}

/// A heart drifting up the screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatingHeart {
    /// Render key.
    pub id: usize,
    /// Horizontal position in percent, `[0, 100)`.
    pub left: f64,
    /// Animation delay in seconds, `[0, 2)`.
    pub delay: f64,
}

/// A confetti square falling down the screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfettiPiece {
    /// Render key.
    pub id: usize,
    /// Horizontal position in percent, `[0, 100)`.
    pub left: f64,
    /// Fill color.
    pub color: ConfettiColor,
    /// Animation delay in seconds, `[0, 2)`.
    pub delay: f64,
}

/// Hearts and confetti shown on the celebration card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Celebration {
    hearts: Vec<FloatingHeart>,
    confetti: Vec<ConfettiPiece>,
}

impl Celebration {
    /// Creates an empty set (nothing rendered).
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current particles with a fresh random batch.
    #[instrument(skip(self, rng))]
    pub fn generate<R: Rng>(&mut self, rng: &mut R) {
        self.hearts = (0..HEART_COUNT)
            .map(|id| FloatingHeart {
                id,
                left: rng.random_range(0.0..100.0),
                delay: rng.random_range(0.0..MAX_DELAY_SECS),
            })
            .collect();

        let palette: Vec<ConfettiColor> = ConfettiColor::iter().collect();
        self.confetti = (0..CONFETTI_COUNT)
            .map(|id| ConfettiPiece {
                id,
                left: rng.random_range(0.0..100.0),
                color: *palette.choose(&mut *rng).unwrap_or(&ConfettiColor::HotPink),
                delay: rng.random_range(0.0..MAX_DELAY_SECS),
            })
            .collect();

        debug!(
            hearts = self.hearts.len(),
            confetti = self.confetti.len(),
            "Generated celebration particles"
        );
    }

    /// Drops all particles.
    pub fn clear(&mut self) {
        self.hearts.clear();
        self.confetti.clear();
    }

    /// True when nothing is rendered.
    pub fn is_empty(&self) -> bool {
        self.hearts.is_empty() && self.confetti.is_empty()
    }

    /// Floating hearts.
    pub fn hearts(&self) -> &[FloatingHeart] {
        &self.hearts
    }

    /// Confetti pieces.
    pub fn confetti(&self) -> &[ConfettiPiece] {
        &self.confetti
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_generate_counts_and_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut celebration = Celebration::new();
        celebration.generate(&mut rng);

        assert_eq!(celebration.hearts().len(), HEART_COUNT);
        assert_eq!(celebration.confetti().len(), CONFETTI_COUNT);
        for heart in celebration.hearts() {
            assert!((0.0..100.0).contains(&heart.left));
            assert!((0.0..MAX_DELAY_SECS).contains(&heart.delay));
        }
        for piece in celebration.confetti() {
            assert!((0.0..100.0).contains(&piece.left));
            assert!((0.0..MAX_DELAY_SECS).contains(&piece.delay));
        }
    }

    #[test]
    fn test_regenerate_replaces() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut celebration = Celebration::new();
        celebration.generate(&mut rng);
        celebration.generate(&mut rng);
        assert_eq!(celebration.hearts().len(), HEART_COUNT);

        celebration.clear();
        assert!(celebration.is_empty());
    }

    #[test]
    fn test_answer_buttons() {
        let all = ProposalAnswer::all();
        assert_eq!(all.len(), 6);
        assert_eq!(all.last(), Some(&ProposalAnswer::No));
        assert_eq!(all[0].label(), "Evet isterim! ❤️");
    }

    #[test]
    fn test_palette_hex_matches_rgb() {
        for color in ConfettiColor::iter() {
            let (r, g, b) = color.rgb();
            assert_eq!(color.hex(), format!("#{r:02x}{g:02x}{b:02x}"));
        }
    }
}
