//! Persistence and notification seams.
//!
//! The store and notifier are injected traits so the core stays free of
//! transport concerns; `()` implementations are provided for hosts (and
//! tests) that don't need them. Persistence is debounced: trailing-edge
//! only, cancel-and-restart on every new edit, driven by an injected clock.

use std::time::Duration;

use vellum_common::VellumError;
use vellum_renderer::TodoStatus;
use web_time::Instant;

/// Where the source buffer is persisted. One write per quiet period.
pub trait ContentStore {
    fn persist(&mut self, content: &str) -> Result<(), VellumError>;
}

/// No-op store.
impl ContentStore for () {
    fn persist(&mut self, _content: &str) -> Result<(), VellumError> {
        Ok(())
    }
}

/// A single-item to-do change, broadcast for cross-session sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoChange {
    /// Which `{{TODO}}` block in the buffer, in source order.
    pub block_index: usize,
    /// Which item within the block, in item order.
    pub item_index: usize,
    pub status: TodoStatus,
}

/// Receives widget-driven change records for the external notification
/// channel (the host's WebSocket client, typically).
pub trait ChangeNotifier {
    fn todo_updated(&self, change: &TodoChange);
}

/// No-op notifier.
impl ChangeNotifier for () {
    fn todo_updated(&self, _change: &TodoChange) {}
}

/// Trailing-edge debounce over an injected clock.
///
/// Each `schedule` cancels the previous deadline and restarts the quiet
/// interval; there is no leading-edge write.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

/// Quiet interval between the last edit and the persist write.
pub const PERSIST_QUIET: Duration = Duration::from_millis(800);

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// Restart the quiet interval from `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    /// Whether the quiet interval has elapsed with no further edits.
    pub fn due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn clear(&mut self) {
        self.deadline = None;
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(PERSIST_QUIET)
    }
}
