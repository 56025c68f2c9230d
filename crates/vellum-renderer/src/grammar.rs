//! The persisted tag grammar.
//!
//! Every pattern here is part of the stored-document format and must stay
//! bit-exact for backward compatibility. The `AT_*` patterns are anchored and
//! matched against a slice starting at the scan position; the `*_SCAN`
//! patterns are unanchored and used by the extraction helpers and the widget
//! controllers.

use regex::Regex;
use std::sync::LazyLock;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("grammar pattern")
}

/// `{{TODO}}` block: literal delimiter lines around a line-oriented body.
pub static AT_TODO_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| re(r"^\{\{TODO\}\}\n(?s:(.*?))\n\{\{/TODO\}\}"));

/// `{{notice}}` (builder) or `{{notice|condition|content}}` (fixed).
pub static AT_NOTICE: LazyLock<Regex> =
    LazyLock::new(|| re(r"^\{\{notice(?:\|(.*?)\|(.*?))?\}\}"));

/// `{{calc}}` (builder) or `{{calc|name:expr}}` (fixed).
pub static AT_CALC: LazyLock<Regex> = LazyLock::new(|| re(r"^\{\{calc(?:\|(.*?))?\}\}"));

/// `[[@Title]]` page link.
pub static AT_PAGE_LINK: LazyLock<Regex> = LazyLock::new(|| re(r"^\[\[@([^\]]+)\]\]"));

/// `[[Name]]` plain tag; the name must not start with `@` and contains no `]`.
pub static AT_TAG: LazyLock<Regex> = LazyLock::new(|| re(r"^\[\[([^@\]][^\]]*)\]\]"));

/// `@YYYY-MM-DD[ HH:MM[-HH:MM]]` time link, `.` or `-` date separators.
pub static AT_TIME_LINK: LazyLock<Regex> = LazyLock::new(|| {
    re(r"^@(\d{4}[.-]\d{2}[.-]\d{2})(?:\s+(\d{1,2}:\d{2})(?:-(\d{1,2}:\d{2}))?)?")
});

/// `{{image|url}}` / `{{video|url}}` media, empty url form included.
pub static AT_MEDIA: LazyLock<Regex> =
    LazyLock::new(|| re(r"^\{\{(image|video)(?:\|(.*?))?\}\}"));

/// One to-do line, matched against the trimmed line:
/// `- [marker] text [@date[ HH:MM]] [[[@Title]]]`.
pub static TODO_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    re(r"^-\s+\[([ ✓×x])\]\s+(.*?)(?:\s+@(\d{4}[.\-]\d{2}[.\-]\d{2}(?:\s+\d{1,2}:\d{2})?))?(?:\s+\[\[@([^\]]+?)\]\])?$")
});

/// The status marker alone, for targeted substitution on a to-do line.
pub static TODO_MARKER: LazyLock<Regex> = LazyLock::new(|| re(r"\[[ ✓×x]\]"));

/// Unanchored `{{TODO}}` block, for locating blocks inside a whole buffer.
pub static TODO_BLOCK_SCAN: LazyLock<Regex> =
    LazyLock::new(|| re(r"\{\{TODO\}\}\n(?s:(.*?))\n\{\{/TODO\}\}"));

/// All `[[@Title]]` references, for link extraction.
pub static PAGE_LINK_SCAN: LazyLock<Regex> = LazyLock::new(|| re(r"\[\[@([^\]]+?)\]\]"));

/// All plain `[[Name]]` tags, for graph tagging.
pub static TAG_SCAN: LazyLock<Regex> = LazyLock::new(|| re(r"\[\[([^@\]][^\]]*)\]\]"));

/// `@date [time[-end]] [Title|reminder]` calendar events.
pub static EVENT_SCAN: LazyLock<Regex> = LazyLock::new(|| {
    re(r"@(\d{4}[.\-]\d{2}[.\-]\d{2})(?:\s+(\d{1,2}:\d{2})(?:-(\d{1,2}:\d{2}))?)?\s*\[(.*?)(?:\|(.*?))?\]")
});

/// All fixed-form `{{notice|condition|content}}` occurrences.
pub static NOTICE_SCAN: LazyLock<Regex> = LazyLock::new(|| re(r"\{\{notice\|(.*?)\|(.*?)\}\}"));

/// Empty `{{image}}` / `{{image|}}` placeholder, matched case-insensitively
/// when an upload completes.
pub static EMPTY_IMAGE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)\{\{image\|?\s*\}\}"));

/// Empty `{{video}}` / `{{video|}}` placeholder.
pub static EMPTY_VIDEO: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)\{\{video\|?\s*\}\}"));

/// Normalize a date's `.` separators to `-` (the canonical output form).
pub fn normalize_date(date: &str) -> String {
    date.replace('.', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_rejects_at_prefix_only() {
        assert!(AT_TAG.is_match("[[Work]]"));
        assert!(AT_TAG.is_match("[[a@b]]"));
        assert!(!AT_TAG.is_match("[[@Page]]"));
        assert!(!AT_TAG.is_match("[[unclosed"));
    }

    #[test]
    fn time_link_accepts_both_separators() {
        let caps = AT_TIME_LINK.captures("@2024.01.15 14:00-15:30 tail").unwrap();
        assert_eq!(&caps[1], "2024.01.15");
        assert_eq!(&caps[2], "14:00");
        assert_eq!(&caps[3], "15:30");
        assert_eq!(normalize_date(&caps[1]), "2024-01-15");

        let caps = AT_TIME_LINK.captures("@2024-01-15").unwrap();
        assert_eq!(&caps[1], "2024-01-15");
        assert!(caps.get(2).is_none());
    }

    #[test]
    fn notice_forms() {
        let caps = AT_NOTICE.captures("{{notice}}").unwrap();
        assert!(caps.get(1).is_none());

        let caps = AT_NOTICE.captures("{{notice|daily 09:00|Drink water}}").unwrap();
        assert_eq!(&caps[1], "daily 09:00");
        assert_eq!(&caps[2], "Drink water");
    }

    #[test]
    fn todo_item_variants() {
        let caps = TODO_ITEM.captures("- [ ] Buy milk @2026-01-01").unwrap();
        assert_eq!(&caps[1], " ");
        assert_eq!(&caps[2], "Buy milk");
        assert_eq!(&caps[3], "2026-01-01");

        let caps = TODO_ITEM
            .captures("- [✓] Meeting @2024.01.15 10:00 [[@Work]]")
            .unwrap();
        assert_eq!(&caps[1], "✓");
        assert_eq!(&caps[3], "2024.01.15 10:00");
        assert_eq!(&caps[4], "Work");

        assert!(TODO_ITEM.is_match("- [x] lowercase done"));
        assert!(!TODO_ITEM.is_match("not a todo line"));
        assert!(!TODO_ITEM.is_match(""));
    }

    #[test]
    fn empty_media_is_case_insensitive() {
        assert!(EMPTY_IMAGE.is_match("{{image}}"));
        assert!(EMPTY_IMAGE.is_match("{{Image| }}"));
        assert!(!EMPTY_IMAGE.is_match("{{image|https://x/y.png}}"));
    }
}
