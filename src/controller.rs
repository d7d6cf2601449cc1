//! Controller tying the session to the camera adapter, timers and toasts.

use std::path::Path;

use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::config::GameConfig;
use crate::game::{
    CameraOutcome, CameraTicket, GuessOutcome, Notifier, ProposalAnswer, ProposalSession, RevealOutcome, Stage,
    TimerQueue, Toast, TransitionError,
};
use crate::media::{MediaCapture, MediaDevices, PhotoFile, Resolution};

/// Drives one proposal session.
///
/// Every user action goes through here. After each action the controller
/// places newly requested timers on its clock, forwards toasts to the
/// notifier and releases the camera if the session was reset.
pub struct ProposalController<D, N> {
    session: ProposalSession,
    capture: MediaCapture<D>,
    timers: TimerQueue,
    notifier: N,
    seen_epoch: u64,
}

impl<D: MediaDevices, N: Notifier> ProposalController<D, N> {
    /// Creates a controller with a fresh session.
    #[instrument(skip_all)]
    pub fn new(config: &GameConfig, devices: D, notifier: N) -> Self {
        Self::with_session(ProposalSession::new(config), config, devices, notifier)
    }

    /// Creates a controller around an existing session.
    #[instrument(skip_all)]
    pub fn with_session(
        session: ProposalSession,
        config: &GameConfig,
        devices: D,
        notifier: N,
    ) -> Self {
        info!("Creating ProposalController");
        let camera = config.camera();
        let fallback = Resolution::new(*camera.fallback_width(), *camera.fallback_height());
        Self {
            seen_epoch: session.epoch(),
            session,
            capture: MediaCapture::new(devices, fallback),
            timers: TimerQueue::new(),
            notifier,
        }
    }

    /// The session state.
    pub fn session(&self) -> &ProposalSession {
        &self.session
    }

    /// The camera adapter.
    pub fn capture(&self) -> &MediaCapture<D> {
        &self.capture
    }

    /// The notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Mutable notifier access.
    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Earliest pending timer deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Number of timers on the clock.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Welcome → riddle.
    pub fn start(&mut self) -> Result<(), TransitionError> {
        let result = self.session.start();
        self.flush(Instant::now());
        result
    }

    /// Reveals one letter of the phrase.
    pub fn reveal_letter(&mut self) -> Result<RevealOutcome, TransitionError> {
        let result = self.session.reveal_letter();
        self.flush(Instant::now());
        result
    }

    /// Updates the guess field.
    pub fn set_guess_draft(&mut self, text: impl Into<String>) {
        self.session.set_guess_draft(text);
    }

    /// Submits a guess.
    pub fn submit_guess(&mut self, text: &str) -> Result<GuessOutcome, TransitionError> {
        let result = self.session.submit_guess(text);
        self.flush(Instant::now());
        result
    }

    /// Submits the guess field.
    pub fn submit_draft(&mut self) -> Result<GuessOutcome, TransitionError> {
        let result = self.session.submit_draft();
        self.flush(Instant::now());
        result
    }

    /// Starts or restarts the camera.
    ///
    /// The request completes exactly once; a second call while one is in
    /// flight is rejected with [`TransitionError::CameraBusy`].
    ///
    /// Dropping the returned future before it completes cancels the
    /// request, so a later call is not rejected as busy.
    #[instrument(skip(self), fields(stage = %self.session.stage()))]
    pub async fn start_camera(&mut self) -> Result<(), TransitionError> {
        let ticket = self.session.begin_camera_request()?;

        let pending = PendingCamera::new(&mut self.session, &ticket);
        let outcome = match self.capture.start_camera().await {
            Ok(profile) => CameraOutcome::Ready(profile),
            Err(error) => CameraOutcome::Failed(error),
        };
        pending.disarm();

        self.complete_camera_request(ticket, outcome)
    }

    /// Hands an acquisition result back to the session.
    ///
    /// A stream acquired for a session that has since moved on is released.
    fn complete_camera_request(
        &mut self,
        ticket: CameraTicket,
        outcome: CameraOutcome,
    ) -> Result<(), TransitionError> {
        let result = self.session.finish_camera_request(ticket, outcome);
        if let Err(TransitionError::StaleToken { .. }) = result {
            debug!("Releasing stream acquired for a stale session");
            self.capture.stop();
        }
        self.flush(Instant::now());
        result
    }

    /// Snapshots the preview and moves to the photo overlay.
    #[instrument(skip(self), fields(stage = %self.session.stage()))]
    pub fn capture_photo(&mut self) -> Result<(), TransitionError> {
        if self.session.stage() != Stage::Camera {
            return Err(TransitionError::WrongStage {
                stage: self.session.stage(),
                action: "capture_photo",
            });
        }

        let result = match self.capture.capture_photo() {
            Ok(photo) => self.session.photo_captured(photo),
            Err(error) => {
                warn!(%error, "Photo capture failed");
                self.session.notify(Toast::capture_failed());
                Ok(())
            }
        };
        self.flush(Instant::now());
        result
    }

    /// Upload fallback: decodes an image file and moves to the overlay.
    ///
    /// `None` means the picker was dismissed and is a no-op.
    #[instrument(skip(self, file), fields(stage = %self.session.stage()))]
    pub fn upload_photo(&mut self, file: Option<PhotoFile>) -> Result<(), TransitionError> {
        let Some(file) = file else {
            debug!("No file selected");
            return Ok(());
        };
        self.session.expect_upload_allowed()?;

        let result = match file.decode() {
            Ok(photo) => {
                self.capture.stop();
                self.session.photo_uploaded(photo)
            }
            Err(error) => {
                warn!(%error, name = %file.name, "Upload rejected");
                self.session.notify(Toast::upload_rejected());
                Ok(())
            }
        };
        self.flush(Instant::now());
        result
    }

    /// Upload fallback from a file on disk.
    #[instrument(skip(self), fields(stage = %self.session.stage()))]
    pub async fn upload_from_path(&mut self, path: &Path) -> Result<(), TransitionError> {
        self.session.expect_upload_allowed()?;

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match tokio::fs::read(path).await {
            Ok(bytes) => self.upload_photo(Some(PhotoFile::new(name, bytes))),
            Err(error) => {
                warn!(%error, "Could not read uploaded file");
                self.session.notify(Toast::upload_rejected());
                self.flush(Instant::now());
                Ok(())
            }
        }
    }

    /// Shows the buildup line and schedules the proposal.
    pub fn continue_buildup(&mut self) -> Result<(), TransitionError> {
        let result = self.session.continue_buildup();
        self.flush(Instant::now());
        result
    }

    /// Handles a proposal button.
    pub fn answer(&mut self, answer: ProposalAnswer) -> Result<(), TransitionError> {
        let result = self.session.answer(answer);
        self.flush(Instant::now());
        result
    }

    /// Celebration → welcome.
    pub fn restart(&mut self) -> Result<(), TransitionError> {
        let result = self.session.restart();
        self.flush(Instant::now());
        result
    }

    /// Fires every timer due at `now`, in deadline order.
    ///
    /// Timers requested while firing are based on the deadline of the timer
    /// that requested them. Returns how many timers took effect.
    #[instrument(skip(self))]
    pub fn fire_due(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while let Some((deadline, scheduled)) = self.timers.pop_due(now) {
            match self.session.fire(scheduled) {
                Ok(()) => fired += 1,
                Err(error) => debug!(%error, "Timer had no effect"),
            }
            self.flush(deadline);
        }
        fired
    }

    /// Moves timers and toasts out of the session; releases the camera on reset.
    fn flush(&mut self, base: Instant) {
        if self.session.epoch() != self.seen_epoch {
            debug!(epoch = self.session.epoch(), "Session reset, releasing camera");
            self.seen_epoch = self.session.epoch();
            self.timers.clear();
            self.capture.stop();
        }
        for scheduled in self.session.take_scheduled() {
            self.timers.push(base, scheduled);
        }
        for toast in self.session.drain_toasts() {
            self.notifier.notify(toast);
        }
    }
}

/// Cancels an in-flight camera request unless disarmed.
///
/// Lives across the acquisition `.await`; if the future is dropped there,
/// the session's in-flight slot is freed on drop.
struct PendingCamera<'a> {
    session: &'a mut ProposalSession,
    ticket: &'a CameraTicket,
    armed: bool,
}

impl<'a> PendingCamera<'a> {
    fn new(session: &'a mut ProposalSession, ticket: &'a CameraTicket) -> Self {
        Self {
            session,
            ticket,
            armed: true,
        }
    }

    /// The acquisition finished; the result will be delivered normally.
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingCamera<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("Camera acquisition dropped before completing");
            self.session.cancel_camera_request(self.ticket);
        }
    }
}
