//! Delayed transitions guarded by a session token.
//!
//! Every timer captures the [`SessionToken`] current when it was scheduled.
//! When it fires, the session compares the token against its own and drops
//! the callback if the player restarted or moved on in the meantime.

use std::time::Duration;

use derive_getters::Getters;
use derive_new::new;
use tokio::time::Instant;
use tracing::{debug, instrument};

use super::stage::Stage;

/// Identity of a session at one stage.
///
/// `epoch` increases on every reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken {
    /// Reset counter.
    pub epoch: u64,
    /// Stage the token was issued on.
    pub stage: Stage,
}

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TimedAction {
    /// Show the "Tamamlandı" toast, then schedule [`TimedAction::AdvanceToCompliment`].
    AnnounceCompletion,
    /// Riddle solved, move to the compliment card.
    AdvanceToCompliment,
    /// Photo overlay finished, move to buildup.
    AdvanceToBuildup,
    /// Buildup finished, move to the proposal.
    AdvanceToProposal,
    /// "Hayır" delay finished, reset the session.
    ResetAfterDecline,
}

impl TimedAction {
    /// True if firing this action changes the stage.
    pub fn changes_stage(self) -> bool {
        !matches!(self, TimedAction::AnnounceCompletion)
    }
}

/// A timer requested by the session, not yet placed on a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, new)]
pub struct ScheduledTransition {
    token: SessionToken,
    action: TimedAction,
    delay: Duration,
}

/// Deadline-ordered queue of pending timers.
#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: Vec<(Instant, ScheduledTransition)>,
}

impl TimerQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a timer on the clock, `delay` after `base`.
    #[instrument(skip(self, base))]
    pub fn push(&mut self, base: Instant, scheduled: ScheduledTransition) {
        let deadline = base + *scheduled.delay();
        debug!(action = %scheduled.action(), ?deadline, "Timer scheduled");
        let at = self.entries.partition_point(|(d, _)| *d <= deadline);
        self.entries.insert(at, (deadline, scheduled));
    }

    /// Removes and returns the earliest timer due at `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<(Instant, ScheduledTransition)> {
        match self.entries.first() {
            Some((deadline, _)) if *deadline <= now => Some(self.entries.remove(0)),
            _ => None,
        }
    }

    /// Earliest deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.first().map(|(deadline, _)| *deadline)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every pending timer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
