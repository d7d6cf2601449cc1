//! Stage enum and the transition table for the proposal flow.
//!
//! A [`Stage`] can only move forward through [`Stage::transition`], which
//! encodes every legal `(stage, trigger)` pair. Anything else is rejected
//! and leaves the caller's state untouched.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::effects::PositiveAnswer;

/// The card currently shown to the player.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Stage {
    /// Greeting card with the start button.
    #[default]
    Welcome,
    /// Letter-reveal puzzle.
    Riddle,
    /// Praise after solving the puzzle, leads to the camera.
    Compliment,
    /// Live camera preview.
    Camera,
    /// Captured photo with the overlay caption.
    PhotoOverlay,
    /// Slow buildup before the question.
    Buildup,
    /// The question itself.
    Proposal,
    /// Hearts and confetti.
    Celebration,
}

impl Stage {
    /// Returns true when a captured photo must exist on this stage.
    pub fn holds_photo(self) -> bool {
        matches!(
            self,
            Stage::PhotoOverlay | Stage::Buildup | Stage::Proposal | Stage::Celebration
        )
    }

    /// Applies a trigger, returning the next stage.
    ///
    /// Restart and decline both land on [`Stage::Welcome`]; clearing the
    /// session data is the caller's job.
    #[instrument]
    pub fn transition(self, trigger: Trigger) -> Result<Stage, TransitionError> {
        let next = match (self, trigger) {
            (Stage::Welcome, Trigger::Start) => Stage::Riddle,
            (Stage::Riddle, Trigger::RiddleSolved) => Stage::Compliment,
            (Stage::Compliment, Trigger::CameraReady) => Stage::Camera,
            (Stage::Compliment, Trigger::PhotoUploaded) => Stage::PhotoOverlay,
            (Stage::Camera, Trigger::PhotoCaptured | Trigger::PhotoUploaded) => {
                Stage::PhotoOverlay
            }
            (Stage::PhotoOverlay, Trigger::OverlayElapsed) => Stage::Buildup,
            (Stage::Buildup, Trigger::BuildupElapsed) => Stage::Proposal,
            (Stage::Proposal, Trigger::Accept(_)) => Stage::Celebration,
            (Stage::Proposal, Trigger::DeclineElapsed) => Stage::Welcome,
            (Stage::Celebration, Trigger::Restart) => Stage::Welcome,
            (stage, trigger) => return Err(TransitionError::InvalidTrigger { stage, trigger }),
        };
        Ok(next)
    }
}

/// Events that can move the flow from one stage to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    /// "Oyuna Başla" pressed.
    Start,
    /// Puzzle solved and its delay elapsed.
    RiddleSolved,
    /// A camera stream was acquired.
    CameraReady,
    /// A frame was snapshotted from the camera.
    PhotoCaptured,
    /// An image file was decoded from the upload fallback.
    PhotoUploaded,
    /// The photo overlay timer elapsed.
    OverlayElapsed,
    /// The buildup timer elapsed.
    BuildupElapsed,
    /// One of the positive answer buttons.
    Accept(PositiveAnswer),
    /// The delay after "Hayır" elapsed.
    DeclineElapsed,
    /// "Tekrar Oyna" pressed.
    Restart,
}

/// Why a user action or timer could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum TransitionError {
    /// The trigger has no row in the transition table for this stage.
    #[display("Trigger {:?} is not valid on stage {}", trigger, stage)]
    InvalidTrigger {
        /// Stage the trigger arrived on.
        stage: Stage,
        /// The rejected trigger.
        trigger: Trigger,
    },

    /// The action is not available on this stage.
    #[display("Action '{}' is not available on stage {}", action, stage)]
    WrongStage {
        /// Stage the action arrived on.
        stage: Stage,
        /// Name of the action.
        action: &'static str,
    },

    /// A delayed stage transition is already scheduled.
    #[display("A stage transition is already pending")]
    TransitionPending,

    /// A camera request is already in flight.
    #[display("Camera acquisition already in progress")]
    CameraBusy,

    /// Every letter of the phrase is already shown.
    #[display("Puzzle already complete")]
    PuzzleComplete,

    /// The guess was empty after trimming.
    #[display("Guess is empty")]
    EmptyGuess,

    /// A timer or camera ticket from an abandoned session or stage.
    #[display("Stale token (epoch {}, stage {})", epoch, stage)]
    StaleToken {
        /// Epoch carried by the token.
        epoch: u64,
        /// Stage carried by the token.
        stage: Stage,
    },
}

impl std::error::Error for TransitionError {}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_forward_path() {
        let stage = Stage::Welcome
            .transition(Trigger::Start)
            .and_then(|s| s.transition(Trigger::RiddleSolved))
            .and_then(|s| s.transition(Trigger::CameraReady))
            .and_then(|s| s.transition(Trigger::PhotoCaptured))
            .and_then(|s| s.transition(Trigger::OverlayElapsed))
            .and_then(|s| s.transition(Trigger::BuildupElapsed))
            .and_then(|s| s.transition(Trigger::Accept(PositiveAnswer::EvetIsterim)))
            .expect("Valid path");
        assert_eq!(stage, Stage::Celebration);
        assert_eq!(stage.transition(Trigger::Restart), Ok(Stage::Welcome));
    }

    #[test]
    fn test_restart_only_from_celebration() {
        for stage in Stage::iter().filter(|s| *s != Stage::Celebration) {
            assert!(matches!(
                stage.transition(Trigger::Restart),
                Err(TransitionError::InvalidTrigger { .. })
            ));
        }
    }

    #[test]
    fn test_start_only_from_welcome() {
        let accepted: Vec<Stage> = Stage::iter()
            .filter(|s| s.transition(Trigger::Start).is_ok())
            .collect();
        assert_eq!(accepted, vec![Stage::Welcome]);
    }

    #[test]
    fn test_upload_allowed_from_compliment_and_camera() {
        let accepted: Vec<Stage> = Stage::iter()
            .filter(|s| s.transition(Trigger::PhotoUploaded).is_ok())
            .collect();
        assert_eq!(accepted, vec![Stage::Compliment, Stage::Camera]);
    }

    #[test]
    fn test_kebab_case_names() {
        assert_eq!(Stage::PhotoOverlay.to_string(), "photo-overlay");
        assert_eq!("buildup".parse::<Stage>(), Ok(Stage::Buildup));
    }
}
