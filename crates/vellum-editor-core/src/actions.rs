//! Widget controllers: the mutation entry points behind each interactive
//! widget.
//!
//! Every controller follows the same funnel: find the target span in a
//! buffer snapshot, apply one whole-span patch, restart the persist
//! debounce. The host re-renders after the call returns, so a mutation is
//! always complete before the next render pass reads the buffer.

use vellum_common::VellumError;
use vellum_renderer::{MediaKind, grammar, todo};
use web_time::Instant;

use crate::buffer::SourceBuffer;
use crate::sync::{ChangeNotifier, ContentStore, Debouncer, TodoChange};

/// Draft validation failures, surfaced to the user verbatim.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftError {
    #[error("select a variable first")]
    MissingVariable,
    #[error("enter a value")]
    MissingValue,
    #[error("enter the reminder content")]
    MissingContent,
}

/// Condition kind selected in the notice builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Time,
    Daily,
    Weekly,
    Interval,
}

impl NoticeKind {
    fn keyword(self) -> &'static str {
        match self {
            NoticeKind::Time => "time",
            NoticeKind::Daily => "daily",
            NoticeKind::Weekly => "weekly",
            NoticeKind::Interval => "every",
        }
    }
}

/// Collected notice-builder state.
#[derive(Debug, Clone)]
pub struct NoticeDraft {
    pub kind: NoticeKind,
    pub value: String,
    pub content: String,
}

impl NoticeDraft {
    /// Normalize into the persisted condition grammar: a bare datetime for
    /// `time`, `daily HH:MM` / `weekly Day HH:MM` (prefix added unless the
    /// value already carries it), `every <value>` for intervals.
    pub fn condition(&self) -> String {
        let value = self.value.trim();
        match self.kind {
            NoticeKind::Time => value.to_owned(),
            NoticeKind::Interval => format!("every {value}"),
            NoticeKind::Daily | NoticeKind::Weekly => {
                let keyword = self.kind.keyword();
                if value.contains(keyword) {
                    value.to_owned()
                } else {
                    format!("{keyword} {value}")
                }
            }
        }
    }

    fn validate(&self) -> Result<(), DraftError> {
        if self.value.trim().is_empty() {
            return Err(DraftError::MissingValue);
        }
        if self.content.trim().is_empty() {
            return Err(DraftError::MissingContent);
        }
        Ok(())
    }
}

/// Collected calc-builder state.
#[derive(Debug, Clone)]
pub struct CalcDraft {
    pub var_name: String,
    pub expression: String,
}

impl CalcDraft {
    fn tag(&self) -> String {
        format!("{{{{calc|{}:{}}}}}", self.var_name, self.expression)
    }

    fn validate(&self) -> Result<(), DraftError> {
        if self.var_name.trim().is_empty() {
            return Err(DraftError::MissingVariable);
        }
        if self.expression.trim().is_empty() {
            return Err(DraftError::MissingValue);
        }
        Ok(())
    }
}

/// Whether a notice save found its placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Applied,
    /// No bare `{{notice}}` in the buffer; the save is a strict no-op (the
    /// fixed form is only reachable through a placeholder).
    NoPlaceholder,
}

/// One editing session over a page's source buffer.
///
/// Both mutation paths - direct typing and widget patches - funnel through
/// this type, so no two sources of edits can interleave mid-patch.
pub struct EditSession<S: ContentStore, N: ChangeNotifier> {
    buffer: SourceBuffer,
    store: S,
    notifier: N,
    debounce: Debouncer,
}

impl<S: ContentStore, N: ChangeNotifier> EditSession<S, N> {
    pub fn new(source: &str, store: S, notifier: N) -> Self {
        Self {
            buffer: SourceBuffer::from_str(source),
            store,
            notifier,
            debounce: Debouncer::default(),
        }
    }

    pub fn buffer(&self) -> &SourceBuffer {
        &self.buffer
    }

    /// Snapshot for the next render pass.
    pub fn source(&self) -> String {
        self.buffer.contents()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Whether edits are waiting on the persist debounce.
    pub fn has_pending_persist(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Direct-typing path: the host hands back the whole editor value.
    pub fn replace_source(&mut self, text: &str, now: Instant) {
        self.buffer.set_contents(text);
        self.debounce.schedule(now);
    }

    /// Toggle one item of one to-do block: patch the marker on its line,
    /// reassemble the block, replace the block span, and emit the change for
    /// the notification channel. Returns `None` when the block or item does
    /// not exist (e.g. a stale widget after a concurrent edit).
    pub fn toggle_todo(
        &mut self,
        block_index: usize,
        item_index: usize,
        now: Instant,
    ) -> Option<TodoChange> {
        let text = self.buffer.contents();
        let caps = grammar::TODO_BLOCK_SCAN
            .captures_iter(&text)
            .nth(block_index)?;
        let whole = caps.get(0)?;
        let body = caps.get(1)?.as_str();

        let (patched_body, status) = todo::toggle_item(body, item_index)?;
        let block = format!("{{{{TODO}}}}\n{patched_body}\n{{{{/TODO}}}}");
        self.buffer.replace_bytes(whole.range(), &block);
        self.debounce.schedule(now);

        let change = TodoChange {
            block_index,
            item_index,
            status,
        };
        self.notifier.todo_updated(&change);
        Some(change)
    }

    /// Confirm the calc builder: substitute the first bare `{{calc}}`
    /// placeholder, or append when none exists.
    pub fn insert_calc(&mut self, draft: &CalcDraft, now: Instant) -> Result<(), DraftError> {
        draft.validate()?;
        let tag = draft.tag();
        let text = self.buffer.contents();
        match text.find("{{calc}}") {
            Some(pos) => self.buffer.replace_bytes(pos..pos + "{{calc}}".len(), &tag),
            None => self.buffer.push_str(&format!("\n{tag}")),
        }
        self.debounce.schedule(now);
        Ok(())
    }

    /// Confirm the notice builder: substitute the first bare `{{notice}}`
    /// placeholder. A missing placeholder is a no-op, not an error.
    pub fn save_notice(
        &mut self,
        draft: &NoticeDraft,
        now: Instant,
    ) -> Result<SaveOutcome, DraftError> {
        draft.validate()?;
        let block = format!(
            "{{{{notice|{}|{}}}}}",
            draft.condition(),
            draft.content.trim()
        );
        let text = self.buffer.contents();
        match text.find("{{notice}}") {
            Some(pos) => {
                self.buffer
                    .replace_bytes(pos..pos + "{{notice}}".len(), &block);
                self.debounce.schedule(now);
                Ok(SaveOutcome::Applied)
            }
            None => {
                tracing::debug!("no bare notice placeholder; save skipped");
                Ok(SaveOutcome::NoPlaceholder)
            }
        }
    }

    /// Upload completion: fill the first empty placeholder of the matching
    /// subtype, or append a resolved tag.
    pub fn complete_upload(&mut self, kind: MediaKind, url: &str, now: Instant) {
        let tag = format!("{{{{{}|{}}}}}", kind.as_str(), url);
        let text = self.buffer.contents();
        let placeholder = match kind {
            MediaKind::Image => &grammar::EMPTY_IMAGE,
            MediaKind::Video => &grammar::EMPTY_VIDEO,
        };
        match placeholder.find(&text) {
            Some(m) => self.buffer.replace_bytes(m.range(), &tag),
            None => self.buffer.push_str(&format!("\n{tag}")),
        }
        self.debounce.schedule(now);
    }

    /// Insert a fresh to-do template dated `today` (`YYYY-MM-DD`), replacing
    /// the first existing block if there is one.
    pub fn insert_todo_template(&mut self, today: &str, now: Instant) {
        let template = format!(
            "{{{{TODO}}}}\n- [ ] New task @{today}\n- [ ] Another task\n- [✓] Finished task\n{{{{/TODO}}}}"
        );
        let text = self.buffer.contents();
        match grammar::TODO_BLOCK_SCAN.find(&text) {
            Some(m) => self.buffer.replace_bytes(m.range(), &template),
            None => self.buffer.push_str(&format!("\n\n{template}")),
        }
        self.debounce.schedule(now);
    }

    /// Drive the persist debounce. Returns `Ok(true)` when a write happened.
    /// On store failure the deadline is kept, so a later flush retries and
    /// no in-memory state is lost.
    pub fn flush(&mut self, now: Instant) -> Result<bool, VellumError> {
        if !self.debounce.due(now) {
            return Ok(false);
        }
        let contents = self.buffer.contents();
        match self.store.persist(&contents) {
            Ok(()) => {
                self.debounce.clear();
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(%err, "persist failed; keeping edits pending");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use vellum_renderer::TodoStatus;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingStore {
        writes: RefCell<Vec<String>>,
    }

    impl ContentStore for RecordingStore {
        fn persist(&mut self, content: &str) -> Result<(), VellumError> {
            self.writes.borrow_mut().push(content.to_owned());
            Ok(())
        }
    }

    struct FailingStore;

    impl ContentStore for FailingStore {
        fn persist(&mut self, _content: &str) -> Result<(), VellumError> {
            Err(VellumError::Persist("connection reset".into()))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        changes: RefCell<Vec<TodoChange>>,
    }

    impl ChangeNotifier for RecordingNotifier {
        fn todo_updated(&self, change: &TodoChange) {
            self.changes.borrow_mut().push(*change);
        }
    }

    const PAGE: &str = "# Plan\n\n{{TODO}}\n- [ ] Buy milk @2026-01-01\n- [✓] Done task\n{{/TODO}}\n\ntail";

    fn session(source: &str) -> EditSession<RecordingStore, RecordingNotifier> {
        EditSession::new(source, RecordingStore::default(), RecordingNotifier::default())
    }

    #[test]
    fn toggle_patches_only_the_marker() {
        let mut session = session(PAGE);
        let now = Instant::now();

        let change = session.toggle_todo(0, 0, now).unwrap();
        assert_eq!(change.status, TodoStatus::Done);

        let expected =
            "# Plan\n\n{{TODO}}\n- [✓] Buy milk @2026-01-01\n- [✓] Done task\n{{/TODO}}\n\ntail";
        assert_eq!(session.source(), expected);
        assert_eq!(session.notifier().changes.borrow().as_slice(), &[change]);
    }

    #[test]
    fn toggle_cycles_through_all_states() {
        let mut session = session(PAGE);
        let now = Instant::now();

        session.toggle_todo(0, 0, now).unwrap();
        session.toggle_todo(0, 0, now).unwrap();
        assert!(session.source().contains("- [×] Buy milk"));
        session.toggle_todo(0, 0, now).unwrap();
        assert!(session.source().contains("- [ ] Buy milk"));
    }

    #[test]
    fn toggle_missing_block_or_item_is_none() {
        let mut session = session(PAGE);
        let now = Instant::now();
        assert!(session.toggle_todo(1, 0, now).is_none());
        assert!(session.toggle_todo(0, 9, now).is_none());
        assert!(session.notifier().changes.borrow().is_empty());
    }

    #[test]
    fn debounced_flush_writes_once_after_quiet() {
        let mut session = session(PAGE);
        let t0 = Instant::now();

        session.toggle_todo(0, 0, t0).unwrap();
        assert!(!session.flush(t0).unwrap());
        assert!(session.has_pending_persist());

        let later = t0 + Duration::from_millis(900);
        assert!(session.flush(later).unwrap());
        assert!(!session.has_pending_persist());
        assert!(!session.flush(later).unwrap());

        let writes = session.store().writes.borrow();
        assert_eq!(writes.len(), 1);
        assert!(writes[0].contains("- [✓] Buy milk"));
    }

    #[test]
    fn failed_persist_keeps_edits_pending() {
        let mut session = EditSession::new(PAGE, FailingStore, ());
        let t0 = Instant::now();
        session.toggle_todo(0, 0, t0).unwrap();

        let later = t0 + Duration::from_secs(1);
        assert!(session.flush(later).is_err());
        assert!(session.has_pending_persist());
        // The in-memory patch is intact.
        assert!(session.source().contains("- [✓] Buy milk"));
    }

    #[test]
    fn insert_calc_replaces_placeholder() {
        let mut session = session("before {{calc}} after");
        let draft = CalcDraft {
            var_name: "calc_money".into(),
            expression: "10+5".into(),
        };
        session.insert_calc(&draft, Instant::now()).unwrap();
        assert_eq!(session.source(), "before {{calc|calc_money:10+5}} after");
    }

    #[test]
    fn insert_calc_appends_without_placeholder() {
        let mut session = session("no placeholder");
        let draft = CalcDraft {
            var_name: "v".into(),
            expression: "1".into(),
        };
        session.insert_calc(&draft, Instant::now()).unwrap();
        assert_eq!(session.source(), "no placeholder\n{{calc|v:1}}");
    }

    #[test]
    fn insert_calc_validates_draft() {
        let mut session = session("{{calc}}");
        let draft = CalcDraft {
            var_name: "".into(),
            expression: "1".into(),
        };
        assert_eq!(
            session.insert_calc(&draft, Instant::now()),
            Err(DraftError::MissingVariable)
        );
        // Nothing changed, nothing scheduled.
        assert_eq!(session.source(), "{{calc}}");
        assert!(!session.has_pending_persist());
    }

    #[test]
    fn notice_condition_normalization() {
        let draft = |kind, value: &str| NoticeDraft {
            kind,
            value: value.into(),
            content: "c".into(),
        };
        assert_eq!(draft(NoticeKind::Time, "2026-02-18 14:00").condition(), "2026-02-18 14:00");
        assert_eq!(draft(NoticeKind::Daily, "09:00").condition(), "daily 09:00");
        assert_eq!(draft(NoticeKind::Daily, "daily 09:00").condition(), "daily 09:00");
        assert_eq!(draft(NoticeKind::Weekly, "Mon 10:00").condition(), "weekly Mon 10:00");
        assert_eq!(draft(NoticeKind::Interval, "1h").condition(), "every 1h");
    }

    #[test]
    fn save_notice_fills_first_placeholder_only() {
        let mut session = session("a {{notice}} b {{notice}}");
        let draft = NoticeDraft {
            kind: NoticeKind::Daily,
            value: "09:00".into(),
            content: "Drink water".into(),
        };
        let outcome = session.save_notice(&draft, Instant::now()).unwrap();
        assert_eq!(outcome, SaveOutcome::Applied);
        assert_eq!(
            session.source(),
            "a {{notice|daily 09:00|Drink water}} b {{notice}}"
        );
    }

    #[test]
    fn save_notice_without_placeholder_is_noop() {
        let mut session = session("no placeholder here");
        let draft = NoticeDraft {
            kind: NoticeKind::Daily,
            value: "09:00".into(),
            content: "x".into(),
        };
        let outcome = session.save_notice(&draft, Instant::now()).unwrap();
        assert_eq!(outcome, SaveOutcome::NoPlaceholder);
        assert_eq!(session.source(), "no placeholder here");
        assert!(!session.has_pending_persist());
    }

    #[test]
    fn upload_fills_matching_placeholder() {
        let mut session = session("{{video}} and {{image}}");
        session.complete_upload(MediaKind::Image, "/up/a.png", Instant::now());
        assert_eq!(session.source(), "{{video}} and {{image|/up/a.png}}");
    }

    #[test]
    fn upload_placeholder_match_is_case_insensitive() {
        let mut session = session("{{Image| }}");
        session.complete_upload(MediaKind::Image, "/up/a.png", Instant::now());
        assert_eq!(session.source(), "{{image|/up/a.png}}");
    }

    #[test]
    fn upload_appends_without_placeholder() {
        let mut session = session("text");
        session.complete_upload(MediaKind::Video, "/up/v.mp4", Instant::now());
        assert_eq!(session.source(), "text\n{{video|/up/v.mp4}}");
    }

    #[test]
    fn todo_template_replaces_existing_block() {
        let mut session = session(PAGE);
        session.insert_todo_template("2026-08-07", Instant::now());
        let source = session.source();
        assert!(source.contains("- [ ] New task @2026-08-07"));
        assert!(!source.contains("Buy milk"));
        assert!(source.starts_with("# Plan\n\n{{TODO}}\n"));
        assert!(source.ends_with("{{/TODO}}\n\ntail"));
    }

    #[test]
    fn todo_template_appends_when_absent() {
        let mut session = session("notes");
        session.insert_todo_template("2026-08-07", Instant::now());
        assert!(session.source().starts_with("notes\n\n{{TODO}}\n"));
    }

    #[test]
    fn direct_typing_schedules_persist() {
        let mut session = session("old");
        let t0 = Instant::now();
        session.replace_source("new contents", t0);
        assert_eq!(session.source(), "new contents");
        assert!(session.flush(t0 + Duration::from_secs(1)).unwrap());
        assert_eq!(session.store().writes.borrow().as_slice(), &["new contents"]);
    }
}
