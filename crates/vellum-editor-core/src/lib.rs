//! vellum-editor-core: widget controllers and source synchronization.
//!
//! This crate owns the write side of the wiki core:
//! - `SourceBuffer` - the authoritative rope-backed source text
//! - `EditSession` - the patch-then-persist-then-rerender funnel behind
//!   every widget interaction and direct edit
//! - `Debouncer` / `VariablePoll` - clock-injected state machines for
//!   debounced persistence and the calc builder's bounded variable retry
//!
//! Rendering lives in `vellum-renderer`; after any mutation here completes,
//! the host triggers a fresh render over a new buffer snapshot.

pub mod actions;
pub mod buffer;
pub mod poll;
pub mod sync;

pub use actions::{CalcDraft, DraftError, EditSession, NoticeDraft, NoticeKind, SaveOutcome};
pub use buffer::SourceBuffer;
pub use poll::{POLL_INTERVAL, POLL_TIMEOUT, PollOutcome, VariablePoll};
pub use sync::{ChangeNotifier, ContentStore, Debouncer, PERSIST_QUIET, TodoChange};
