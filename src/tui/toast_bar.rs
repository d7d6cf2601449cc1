//! Toast bar: keeps recent toasts visible for a few seconds.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::{debug, instrument};

use crate::game::{Notifier, Toast};

/// How long a toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(3);

const MAX_QUEUED: usize = 8;

/// [`Notifier`] that shows the newest toast until it expires.
#[derive(Debug)]
pub struct ToastBar {
    entries: VecDeque<(Instant, Toast)>,
    ttl: Duration,
}

impl ToastBar {
    /// Creates an empty bar with the default lifetime.
    pub fn new() -> Self {
        Self::with_ttl(TOAST_TTL)
    }

    /// Creates an empty bar with a custom lifetime.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: VecDeque::new(),
            ttl,
        }
    }

    /// Newest toast still visible at `now`.
    pub fn current(&self, now: Instant) -> Option<&Toast> {
        self.entries
            .back()
            .filter(|(shown, _)| now.duration_since(*shown) < self.ttl)
            .map(|(_, toast)| toast)
    }

    /// Drops expired toasts.
    pub fn prune(&mut self, now: Instant) {
        while let Some((shown, _)) = self.entries.front() {
            if now.duration_since(*shown) < self.ttl {
                break;
            }
            self.entries.pop_front();
        }
    }

    fn push_at(&mut self, now: Instant, toast: Toast) {
        if self.entries.len() == MAX_QUEUED {
            self.entries.pop_front();
        }
        self.entries.push_back((now, toast));
    }
}

impl Default for ToastBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ToastBar {
    #[instrument(skip(self, toast), fields(title = %toast.title))]
    fn notify(&mut self, toast: Toast) {
        debug!("Showing toast");
        self.push_at(Instant::now(), toast);
    }
}
