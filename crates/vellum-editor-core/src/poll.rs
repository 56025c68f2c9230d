//! Bounded retry for the calc builder's variable list.
//!
//! When a calc builder renders while the variable directory is still empty,
//! the host re-fetches the list on a fixed interval until it arrives or a
//! hard timeout passes - never an unbounded loop. The state machine is
//! clock-injected so hosts drive it from whatever tick source they have.

use std::time::Duration;

use vellum_common::VariableDirectory;
use web_time::Instant;

/// Re-fetch interval while waiting for variables.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Hard deadline after which the builder gives up silently.
pub const POLL_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Variables arrived; re-render the builder with real options.
    Ready,
    /// Still waiting; check again later.
    Waiting,
    /// Interval elapsed; the host should re-fetch the list now.
    Retry,
    /// Timed out; leave the builder in its disabled state.
    GaveUp,
}

/// One builder's bounded poll.
#[derive(Debug, Clone)]
pub struct VariablePoll {
    started: Instant,
    next_attempt: Instant,
}

impl VariablePoll {
    pub fn new(now: Instant) -> Self {
        Self {
            started: now,
            next_attempt: now + POLL_INTERVAL,
        }
    }

    pub fn tick(&mut self, now: Instant, variables: &VariableDirectory) -> PollOutcome {
        if !variables.is_empty() {
            return PollOutcome::Ready;
        }
        if now.duration_since(self.started) >= POLL_TIMEOUT {
            tracing::debug!("variable list never arrived; giving up");
            return PollOutcome::GaveUp;
        }
        if now >= self.next_attempt {
            self.next_attempt = now + POLL_INTERVAL;
            PollOutcome::Retry
        } else {
            PollOutcome::Waiting
        }
    }
}
