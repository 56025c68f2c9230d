//! The to-do list engine: line grammar, status cycle, marker patching.
//!
//! Parsing is line-oriented and independent per line. A line that fails the
//! item pattern is not an error - it simply isn't a to-do line (blank
//! separators inside a block are dropped from the item list but preserved in
//! the body).

use smol_str::{SmolStr, ToSmolStr};

use crate::grammar;

/// Status of one to-do item. Toggling cycles strictly
/// pending -> done -> cancelled -> pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoStatus {
    Pending,
    Done,
    Cancelled,
}

impl TodoStatus {
    /// The next status in the fixed cycle. No other transition exists.
    pub fn next(self) -> Self {
        match self {
            TodoStatus::Pending => TodoStatus::Done,
            TodoStatus::Done => TodoStatus::Cancelled,
            TodoStatus::Cancelled => TodoStatus::Pending,
        }
    }

    /// The marker written between brackets in source text.
    ///
    /// `x` is accepted on input as a done marker but never written back;
    /// round-tripping an `x` line normalizes it (one-way, documented).
    pub fn marker(self) -> char {
        match self {
            TodoStatus::Pending => ' ',
            TodoStatus::Done => '✓',
            TodoStatus::Cancelled => '×',
        }
    }

    /// The glyph shown in the rendered checklist.
    pub fn glyph(self) -> char {
        match self {
            TodoStatus::Pending => '○',
            TodoStatus::Done => '✓',
            TodoStatus::Cancelled => '×',
        }
    }

    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            ' ' => Some(TodoStatus::Pending),
            '✓' | 'x' => Some(TodoStatus::Done),
            '×' => Some(TodoStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TodoStatus::Pending => "pending",
            TodoStatus::Done => "done",
            TodoStatus::Cancelled => "cancelled",
        }
    }
}

/// One parsed to-do line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub status: TodoStatus,
    pub text: SmolStr,
    /// Due date (and optional time), separator-normalized to dashes.
    pub due: Option<SmolStr>,
    /// Linked page title from a trailing `[[@Title]]`.
    pub link: Option<SmolStr>,
    /// The exact source line, kept so status patches never reformat the rest
    /// of the line.
    pub raw: SmolStr,
}

/// Parse a block body into its items, skipping non-item lines.
pub fn parse_items(body: &str) -> Vec<TodoItem> {
    body.split('\n').filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<TodoItem> {
    let caps = grammar::TODO_ITEM.captures(line.trim())?;
    let marker = caps.get(1)?.as_str().chars().next()?;
    let status = TodoStatus::from_marker(marker)?;
    Some(TodoItem {
        status,
        text: caps.get(2)?.as_str().trim().to_smolstr(),
        due: caps
            .get(3)
            .map(|m| grammar::normalize_date(m.as_str()).into()),
        link: caps.get(4).map(|m| m.as_str().to_smolstr()),
        raw: line.to_smolstr(),
    })
}

/// Rewrite only the bracket marker on a to-do line, preserving every other
/// character (including trailing date/link annotations).
pub fn patch_marker(line: &str, status: TodoStatus) -> Option<String> {
    let m = grammar::TODO_MARKER.find(line)?;
    let mut patched = String::with_capacity(line.len() + 2);
    patched.push_str(&line[..m.start()]);
    patched.push('[');
    patched.push(status.marker());
    patched.push(']');
    patched.push_str(&line[m.end()..]);
    Some(patched)
}

/// Patch the marker of the `item_index`-th *item* within a block body,
/// leaving all other lines (item or not) byte-identical, and return the
/// reassembled body together with the item's new status.
///
/// Item order counts only lines matching the item pattern, so blocks with
/// interleaved non-item lines patch the right line.
pub fn toggle_item(body: &str, item_index: usize) -> Option<(String, TodoStatus)> {
    let mut seen = 0usize;
    let mut next_status = None;
    // split('\n') rather than lines(): a trailing newline in the body must
    // survive reassembly byte for byte.
    let lines: Vec<String> = body
        .split('\n')
        .map(|line| {
            if next_status.is_none() {
                if let Some(item) = parse_line(line) {
                    if seen == item_index {
                        let next = item.status.next();
                        if let Some(patched) = patch_marker(line, next) {
                            next_status = Some(next);
                            return patched;
                        }
                    }
                    seen += 1;
                }
            }
            line.to_owned()
        })
        .collect();

    next_status.map(|status| (lines.join("\n"), status))
}
