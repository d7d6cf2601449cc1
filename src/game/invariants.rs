//! First-class invariants for the proposal session.
//!
//! Invariants are logical properties that must hold after every operation.
//! They are checked in debug builds and can be tested independently.

use super::effects::{CONFETTI_COUNT, HEART_COUNT};
use super::puzzle::{INITIAL_REVEALED, letter_count, letter_indices};
use super::session::ProposalSession;
use super::stage::Stage;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Returns every violated invariant, or `Ok(())` if all hold.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Invariant: the reveal set stays within the phrase's letters.
///
/// It always contains the two initial letters, never the space, and never
/// more than `letter_count()` letters.
pub struct RevealBoundedInvariant;

impl Invariant<ProposalSession> for RevealBoundedInvariant {
    fn holds(session: &ProposalSession) -> bool {
        let reveal = &session.reveal;
        let letters: Vec<usize> = letter_indices().collect();

        INITIAL_REVEALED.iter().all(|i| reveal.contains(*i))
            && reveal.iter().all(|i| letters.contains(&i))
            && reveal.len() <= letter_count()
    }

    fn description() -> &'static str {
        "Reveal set holds the initial letters and only phrase letters"
    }
}

/// Invariant: a photo exists exactly on the stages that display one.
pub struct PhotoMatchesStageInvariant;

impl Invariant<ProposalSession> for PhotoMatchesStageInvariant {
    fn holds(session: &ProposalSession) -> bool {
        session.photo.is_some() == session.stage.holds_photo()
    }

    fn description() -> &'static str {
        "Photo is present only from the overlay stage onwards"
    }
}

/// Invariant: decorations exist only on the celebration card, in full.
pub struct DecorationsMatchStageInvariant;

impl Invariant<ProposalSession> for DecorationsMatchStageInvariant {
    fn holds(session: &ProposalSession) -> bool {
        let celebration = &session.celebration;
        if session.stage == Stage::Celebration {
            celebration.hearts().len() == HEART_COUNT
                && celebration.confetti().len() == CONFETTI_COUNT
                && session.show_main_heart
        } else {
            celebration.is_empty() && !session.show_main_heart
        }
    }

    fn description() -> &'static str {
        "Decorations are present exactly on the celebration stage"
    }
}

/// All session invariants as a composable set.
pub type SessionInvariants = (
    RevealBoundedInvariant,
    PhotoMatchesStageInvariant,
    DecorationsMatchStageInvariant,
);
