//! Pure proposal-flow logic: stages, puzzle, decorations and timers.

mod effects;
mod invariants;
mod notify;
mod puzzle;
mod session;
mod stage;
mod timer;

pub use effects::{
    CONFETTI_COUNT, Celebration, ConfettiColor, ConfettiPiece, FloatingHeart, HEART_COUNT,
    PositiveAnswer, ProposalAnswer,
};
pub use invariants::{
    DecorationsMatchStageInvariant, Invariant, InvariantSet, InvariantViolation,
    PhotoMatchesStageInvariant, RevealBoundedInvariant, SessionInvariants,
};
pub use notify::{Notifier, Toast, ToastLog, ToastVariant};
pub use puzzle::{
    INITIAL_REVEALED, RevealOutcome, RevealSet, TARGET_PHRASE, letter_count, matches_phrase,
};
pub use session::{CameraOutcome, CameraTicket, GuessOutcome, ProposalSession};
pub use stage::{Stage, TransitionError, Trigger};
pub use timer::{ScheduledTransition, SessionToken, TimedAction, TimerQueue};
