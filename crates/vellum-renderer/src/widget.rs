//! Widget sessions: explicit identity for interactive markup.
//!
//! Every builder form, upload placeholder, and checklist rendered in a pass
//! gets a generated id from a registry scoped to that pass. The host wires
//! user interaction back to the matching source span through these sessions
//! instead of fishing ephemeral ids out of the DOM.

use std::fmt;
use std::ops::Range;

use crate::token::MediaKind;

/// Identifier of one widget within a single render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(u32);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// What kind of interaction a session expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    /// A rendered checklist whose items can be toggled.
    TodoList,
    /// An empty `{{notice}}` awaiting its condition and content.
    NoticeBuilder,
    /// An empty `{{calc}}`; `awaiting_variables` marks a builder rendered
    /// while the variable directory was still empty, which the host should
    /// drive with a bounded `VariablePoll`.
    CalcBuilder { awaiting_variables: bool },
    /// An upload placeholder for the given media subtype.
    MediaUpload(MediaKind),
}

/// One interactive widget rendered in this pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSession {
    pub id: WidgetId,
    pub kind: WidgetKind,
    /// The claimed span in the source that interactions will patch.
    pub span: Range<usize>,
}

/// Allocates widget ids for one render pass.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    sessions: Vec<WidgetSession>,
}

impl WidgetRegistry {
    pub fn register(&mut self, kind: WidgetKind, span: Range<usize>) -> WidgetId {
        let id = WidgetId(self.sessions.len() as u32);
        self.sessions.push(WidgetSession { id, kind, span });
        id
    }

    pub fn sessions(&self) -> &[WidgetSession] {
        &self.sessions
    }

    pub fn into_sessions(self) -> Vec<WidgetSession> {
        self.sessions
    }
}
