//! The proposal session: stage, puzzle, photo and decorations in one place.
//!
//! All mutation goes through the operations below. Each one validates the
//! current stage first and returns a [`TransitionError`] without touching
//! any state when the action does not apply. Delayed transitions are not
//! run here; they are handed out as [`ScheduledTransition`]s and come back
//! through [`ProposalSession::fire`].

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, instrument, warn};

use super::effects::{Celebration, ProposalAnswer};
use super::invariants::{InvariantSet, InvariantViolation, SessionInvariants};
use super::notify::Toast;
use super::puzzle::{RevealOutcome, RevealSet, matches_phrase};
use super::stage::{Stage, TransitionError, Trigger};
use super::timer::{ScheduledTransition, SessionToken, TimedAction};
use crate::config::{GameConfig, TimingConfig};
use crate::media::{ConstraintProfile, MediaError, PhotoPayload};

/// Result of a submitted guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The guess contains the phrase; the riddle will close.
    Matched,
    /// Wrong guess; a retry toast was emitted.
    Mismatch,
}

/// Proof that a camera request was started.
///
/// Not `Clone`: the request completes exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct CameraTicket {
    token: SessionToken,
    request: u64,
}

impl CameraTicket {
    /// Token captured when the request started.
    pub fn token(&self) -> SessionToken {
        self.token
    }
}

/// How a camera request ended.
#[derive(Debug)]
pub enum CameraOutcome {
    /// A stream was bound using this profile.
    Ready(ConstraintProfile),
    /// Every profile failed; carries the last error.
    Failed(MediaError),
}

/// In-memory state of one run through the proposal flow.
#[derive(Debug)]
pub struct ProposalSession {
    pub(super) stage: Stage,
    pub(super) epoch: u64,
    pub(super) reveal: RevealSet,
    pub(super) guess_draft: String,
    pub(super) photo: Option<PhotoPayload>,
    pub(super) celebration: Celebration,
    pub(super) show_buildup: bool,
    pub(super) show_main_heart: bool,
    pub(super) transition_pending: bool,
    pub(super) camera_in_flight: bool,
    camera_requests: u64,
    outbox: Vec<Toast>,
    scheduled: Vec<ScheduledTransition>,
    timing: TimingConfig,
    recipient: String,
    rng: StdRng,
}

impl ProposalSession {
    /// Creates a session from configuration, seeding the RNG if a seed is set.
    #[instrument(skip(config), fields(recipient = %config.recipient()))]
    pub fn new(config: &GameConfig) -> Self {
        let rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(*seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }

    /// Creates a session with an explicit RNG.
    #[instrument(skip(config, rng))]
    pub fn with_rng(config: &GameConfig, rng: StdRng) -> Self {
        info!("Creating proposal session");
        Self {
            stage: Stage::Welcome,
            epoch: 0,
            reveal: RevealSet::new(),
            guess_draft: String::new(),
            photo: None,
            celebration: Celebration::new(),
            show_buildup: false,
            show_main_heart: false,
            transition_pending: false,
            camera_in_flight: false,
            camera_requests: 0,
            outbox: Vec::new(),
            scheduled: Vec::new(),
            timing: *config.timing(),
            recipient: config.recipient().clone(),
            rng,
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Accessors
    // ─────────────────────────────────────────────────────────────

    /// Current stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Reset counter.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Token identifying the current session and stage.
    pub fn token(&self) -> SessionToken {
        SessionToken {
            epoch: self.epoch,
            stage: self.stage,
        }
    }

    /// Revealed letter positions.
    pub fn reveal(&self) -> &RevealSet {
        &self.reveal
    }

    /// Phrase as shown on the riddle card.
    pub fn display_phrase(&self) -> String {
        self.reveal.display()
    }

    /// Whether the "Harf Al" control is enabled.
    pub fn can_reveal(&self) -> bool {
        self.stage == Stage::Riddle && !self.reveal.is_complete()
    }

    /// Text typed into the guess field.
    pub fn guess_draft(&self) -> &str {
        &self.guess_draft
    }

    /// Whether the "Tahmin Et" control is enabled.
    pub fn can_guess(&self) -> bool {
        self.stage == Stage::Riddle && !self.guess_draft.trim().is_empty()
    }

    /// Captured or uploaded photo.
    pub fn photo(&self) -> Option<&PhotoPayload> {
        self.photo.as_ref()
    }

    /// Hearts and confetti.
    pub fn celebration(&self) -> &Celebration {
        &self.celebration
    }

    /// Whether the buildup sub-reveal line is visible.
    pub fn show_buildup(&self) -> bool {
        self.show_buildup
    }

    /// Whether the large celebration heart is visible.
    pub fn show_main_heart(&self) -> bool {
        self.show_main_heart
    }

    /// True while a delayed stage transition is scheduled.
    pub fn is_transition_pending(&self) -> bool {
        self.transition_pending
    }

    /// True while a camera request is in flight.
    pub fn is_camera_in_flight(&self) -> bool {
        self.camera_in_flight
    }

    /// Name shown on the cards.
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Removes and returns toasts emitted since the last call.
    pub fn drain_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.outbox)
    }

    /// Removes and returns timers requested since the last call.
    pub fn take_scheduled(&mut self) -> Vec<ScheduledTransition> {
        std::mem::take(&mut self.scheduled)
    }

    /// Checks every session invariant.
    pub fn check_invariants(&self) -> Result<(), Vec<InvariantViolation>> {
        SessionInvariants::check_all(self)
    }

    // ─────────────────────────────────────────────────────────────
    //  Welcome / Riddle
    // ─────────────────────────────────────────────────────────────

    /// "Oyuna Başla": welcome → riddle.
    #[instrument(skip(self), fields(stage = %self.stage))]
    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.advance(Trigger::Start)?;
        self.settle();
        Ok(())
    }

    /// "Harf Al": reveals one random hidden letter.
    ///
    /// Revealing the last letter schedules the completion toast, which in
    /// turn schedules the move to the compliment card.
    #[instrument(skip(self), fields(stage = %self.stage))]
    pub fn reveal_letter(&mut self) -> Result<RevealOutcome, TransitionError> {
        self.expect_stage(Stage::Riddle, "reveal_letter")?;

        let outcome = self.reveal.reveal(&mut self.rng);
        match outcome {
            RevealOutcome::AlreadyComplete => return Err(TransitionError::PuzzleComplete),
            RevealOutcome::Completed(index) => {
                info!(index, "Phrase fully revealed");
                if self.transition_pending {
                    debug!("Riddle already closing, not scheduling again");
                } else {
                    self.transition_pending = true;
                    self.schedule(TimedAction::AnnounceCompletion, self.timing.completion_toast());
                }
            }
            RevealOutcome::Revealed(index) => debug!(index, "Letter revealed"),
        }

        self.settle();
        Ok(outcome)
    }

    /// Updates the guess field.
    pub fn set_guess_draft(&mut self, text: impl Into<String>) {
        self.guess_draft = text.into();
    }

    /// Submits the current guess field.
    pub fn submit_draft(&mut self) -> Result<GuessOutcome, TransitionError> {
        let draft = self.guess_draft.clone();
        self.submit_guess(&draft)
    }

    /// "Tahmin Et": checks a free-text guess.
    #[instrument(skip(self), fields(stage = %self.stage))]
    pub fn submit_guess(&mut self, text: &str) -> Result<GuessOutcome, TransitionError> {
        self.expect_stage(Stage::Riddle, "submit_guess")?;
        if text.trim().is_empty() {
            return Err(TransitionError::EmptyGuess);
        }
        if self.transition_pending {
            return Err(TransitionError::TransitionPending);
        }

        let outcome = if matches_phrase(text) {
            info!("Guess matched");
            self.outbox.push(Toast::guess_correct());
            self.transition_pending = true;
            self.schedule(TimedAction::AdvanceToCompliment, self.timing.advance());
            GuessOutcome::Matched
        } else {
            debug!("Guess did not match");
            self.outbox.push(Toast::guess_wrong());
            GuessOutcome::Mismatch
        };

        self.settle();
        Ok(outcome)
    }

    // ─────────────────────────────────────────────────────────────
    //  Compliment / Camera
    // ─────────────────────────────────────────────────────────────

    /// Marks a camera request as in flight.
    ///
    /// Allowed on the compliment card ("Devam Et") and on the camera card
    /// ("Kamerayı Yeniden Başlat").
    #[instrument(skip(self), fields(stage = %self.stage))]
    pub fn begin_camera_request(&mut self) -> Result<CameraTicket, TransitionError> {
        if !matches!(self.stage, Stage::Compliment | Stage::Camera) {
            return Err(TransitionError::WrongStage {
                stage: self.stage,
                action: "start_camera",
            });
        }
        if self.camera_in_flight {
            warn!("Camera request ignored, one is already in flight");
            return Err(TransitionError::CameraBusy);
        }

        self.camera_in_flight = true;
        self.camera_requests += 1;
        Ok(CameraTicket {
            token: self.token(),
            request: self.camera_requests,
        })
    }

    /// Completes a camera request started with [`Self::begin_camera_request`].
    ///
    /// Returns [`TransitionError::StaleToken`] if the session moved on while
    /// the request was running or a newer request replaced it; the caller
    /// should release the stream then.
    #[instrument(skip(self, ticket), fields(stage = %self.stage))]
    pub fn finish_camera_request(
        &mut self,
        ticket: CameraTicket,
        outcome: CameraOutcome,
    ) -> Result<(), TransitionError> {
        if self.owns_camera_slot(&ticket) {
            self.camera_in_flight = false;
        }
        if ticket.token != self.token() || ticket.request != self.camera_requests {
            debug!(?ticket, "Camera result arrived for a stale session");
            return Err(TransitionError::StaleToken {
                epoch: ticket.token.epoch,
                stage: ticket.token.stage,
            });
        }

        match outcome {
            CameraOutcome::Ready(profile) => {
                info!(profile = %profile, "Camera ready");
                if self.stage == Stage::Compliment {
                    self.advance(Trigger::CameraReady)?;
                }
                self.outbox.push(Toast::camera_ready());
            }
            CameraOutcome::Failed(error) => {
                warn!(error = %error, "Camera access failed on every profile");
                self.outbox.push(Toast::camera_failed());
            }
        }

        self.settle();
        Ok(())
    }

    /// Abandons a camera request whose acquisition was dropped.
    ///
    /// Frees the in-flight slot so a later request can start. No toast and
    /// no stage change. An older ticket leaves a newer request alone.
    #[instrument(skip(self), fields(stage = %self.stage))]
    pub fn cancel_camera_request(&mut self, ticket: &CameraTicket) {
        if self.owns_camera_slot(ticket) {
            debug!(?ticket, "Camera request cancelled");
            self.camera_in_flight = false;
        }
    }

    /// Stores a camera snapshot: camera → photo-overlay.
    #[instrument(skip(self, photo), fields(stage = %self.stage))]
    pub fn photo_captured(&mut self, photo: PhotoPayload) -> Result<(), TransitionError> {
        self.store_photo(Trigger::PhotoCaptured, photo)
    }

    /// Stores an uploaded image: compliment/camera → photo-overlay.
    #[instrument(skip(self, photo), fields(stage = %self.stage))]
    pub fn photo_uploaded(&mut self, photo: PhotoPayload) -> Result<(), TransitionError> {
        self.store_photo(Trigger::PhotoUploaded, photo)
    }

    /// Checks that an upload would be accepted right now.
    pub fn expect_upload_allowed(&self) -> Result<(), TransitionError> {
        self.stage.transition(Trigger::PhotoUploaded).map(|_| ())
    }

    /// Emits a toast on behalf of the media adapter.
    pub(crate) fn notify(&mut self, toast: Toast) {
        self.outbox.push(toast);
    }

    fn store_photo(&mut self, trigger: Trigger, photo: PhotoPayload) -> Result<(), TransitionError> {
        self.advance(trigger)?;
        info!(mime = %photo.mime(), bytes = photo.as_str().len(), "Photo stored");
        self.photo = Some(photo);
        self.transition_pending = true;
        self.schedule(TimedAction::AdvanceToBuildup, self.timing.overlay());
        self.settle();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Buildup / Proposal / Celebration
    // ─────────────────────────────────────────────────────────────

    /// "Devam Et" on the buildup card: shows the sub-reveal and schedules
    /// the proposal.
    #[instrument(skip(self), fields(stage = %self.stage))]
    pub fn continue_buildup(&mut self) -> Result<(), TransitionError> {
        self.expect_stage(Stage::Buildup, "continue_buildup")?;
        if self.transition_pending {
            return Err(TransitionError::TransitionPending);
        }

        self.show_buildup = true;
        self.transition_pending = true;
        self.schedule(TimedAction::AdvanceToProposal, self.timing.buildup());
        self.settle();
        Ok(())
    }

    /// A button on the proposal card.
    #[instrument(skip(self), fields(stage = %self.stage))]
    pub fn answer(&mut self, answer: ProposalAnswer) -> Result<(), TransitionError> {
        self.expect_stage(Stage::Proposal, "answer")?;

        match answer {
            ProposalAnswer::Yes(positive) => {
                self.advance(Trigger::Accept(positive))?;
                self.celebration.generate(&mut self.rng);
                self.show_main_heart = true;
                self.outbox.push(Toast::accepted(&self.recipient));
                info!(answer = positive.label(), "Proposal accepted");
            }
            ProposalAnswer::No => {
                if self.transition_pending {
                    return Err(TransitionError::TransitionPending);
                }
                info!("Proposal declined, resetting after delay");
                self.outbox.push(Toast::declined());
                self.transition_pending = true;
                self.schedule(TimedAction::ResetAfterDecline, self.timing.decline_reset());
            }
        }

        self.settle();
        Ok(())
    }

    /// "Tekrar Oyna": celebration → welcome, clearing everything.
    #[instrument(skip(self), fields(stage = %self.stage))]
    pub fn restart(&mut self) -> Result<(), TransitionError> {
        self.advance(Trigger::Restart)?;
        self.reset();
        self.settle();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Timers
    // ─────────────────────────────────────────────────────────────

    /// Runs a timer previously handed out by [`Self::take_scheduled`].
    ///
    /// Timers from an earlier epoch or stage are rejected without effect.
    #[instrument(skip(self), fields(stage = %self.stage, epoch = self.epoch))]
    pub fn fire(&mut self, scheduled: ScheduledTransition) -> Result<(), TransitionError> {
        let token = *scheduled.token();
        if token != self.token() {
            debug!(?token, action = %scheduled.action(), "Dropping stale timer");
            return Err(TransitionError::StaleToken {
                epoch: token.epoch,
                stage: token.stage,
            });
        }

        debug!(
            action = %scheduled.action(),
            changes_stage = scheduled.action().changes_stage(),
            "Timer fired"
        );
        match scheduled.action() {
            TimedAction::AnnounceCompletion => {
                self.outbox.push(Toast::letters_complete());
                self.schedule(TimedAction::AdvanceToCompliment, self.timing.advance());
            }
            TimedAction::AdvanceToCompliment => self.advance(Trigger::RiddleSolved)?,
            TimedAction::AdvanceToBuildup => self.advance(Trigger::OverlayElapsed)?,
            TimedAction::AdvanceToProposal => self.advance(Trigger::BuildupElapsed)?,
            TimedAction::ResetAfterDecline => {
                self.advance(Trigger::DeclineElapsed)?;
                self.reset();
            }
        }

        self.settle();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Internals
    // ─────────────────────────────────────────────────────────────

    fn expect_stage(&self, expected: Stage, action: &'static str) -> Result<(), TransitionError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(TransitionError::WrongStage {
                stage: self.stage,
                action,
            })
        }
    }

    /// True if `ticket` belongs to the request currently in flight.
    fn owns_camera_slot(&self, ticket: &CameraTicket) -> bool {
        self.camera_in_flight
            && ticket.token.epoch == self.epoch
            && ticket.request == self.camera_requests
    }

    /// Applies a trigger through the transition table.
    fn advance(&mut self, trigger: Trigger) -> Result<(), TransitionError> {
        let next = self.stage.transition(trigger)?;
        info!(from = %self.stage, to = %next, ?trigger, "Stage transition");
        self.stage = next;
        self.transition_pending = false;
        Ok(())
    }

    fn schedule(&mut self, action: TimedAction, delay: std::time::Duration) {
        debug!(%action, ?delay, "Scheduling timed action");
        self.scheduled
            .push(ScheduledTransition::new(self.token(), action, delay));
    }

    /// Clears all session data and bumps the epoch.
    fn reset(&mut self) {
        self.epoch += 1;
        info!(epoch = self.epoch, "Session reset");
        self.stage = Stage::Welcome;
        self.reveal = RevealSet::new();
        self.guess_draft.clear();
        self.photo = None;
        self.celebration.clear();
        self.show_buildup = false;
        self.show_main_heart = false;
        self.transition_pending = false;
        self.camera_in_flight = false;
        self.scheduled.clear();
    }

    /// Verifies invariants after an operation (debug builds only).
    fn settle(&self) {
        #[cfg(debug_assertions)]
        if let Err(violations) = self.check_invariants() {
            for violation in &violations {
                warn!(description = %violation.description, "Session invariant violated");
            }
            debug_assert!(violations.is_empty(), "Session invariants violated");
        }
    }
}
