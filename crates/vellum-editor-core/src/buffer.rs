//! The authoritative source buffer.
//!
//! Ropey-backed so block patches stay O(log n) on large pages. Widget
//! controllers work on a `contents()` snapshot to find spans, then apply a
//! single whole-span `replace_bytes` - never merged character edits - so
//! mutations are atomic with respect to the snapshot.

use std::ops::Range;

use ropey::Rope;

#[derive(Debug, Clone, Default)]
pub struct SourceBuffer {
    rope: Rope,
}

impl SourceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_str(source: &str) -> Self {
        Self {
            rope: Rope::from_str(source),
        }
    }

    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// Snapshot of the whole buffer. Span offsets found in a snapshot are
    /// valid for `replace_bytes` until the next mutation.
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    /// Replace a byte span with new text.
    pub fn replace_bytes(&mut self, range: Range<usize>, text: &str) {
        let start = self.rope.byte_to_char(range.start);
        let end = self.rope.byte_to_char(range.end);
        self.rope.remove(start..end);
        self.rope.insert(start, text);
    }

    /// Append text at the end of the buffer.
    pub fn push_str(&mut self, text: &str) {
        let end = self.rope.len_chars();
        self.rope.insert(end, text);
    }

    /// Replace the entire buffer (the direct-typing path: the host editor
    /// hands back the whole textarea value).
    pub fn set_contents(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }
}

impl From<&str> for SourceBuffer {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl std::fmt::Display for SourceBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rope)
    }
}
