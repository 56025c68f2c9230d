//! Content extraction for the graph, calendar, and reminder collaborators.
//!
//! Pure scans over a source string; nothing here renders or mutates. The
//! graph view builds edges from `page_links` and node tags from `tags`, the
//! calendar view collects `calendar_events`, and the notification transport
//! collects `notices`.

use serde::Serialize;
use smol_str::{SmolStr, ToSmolStr};

use crate::grammar;

/// All `[[@Title]]` targets in source order, duplicates preserved.
pub fn page_links(source: &str) -> Vec<SmolStr> {
    grammar::PAGE_LINK_SCAN
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_smolstr())
        .collect()
}

/// All plain `[[Name]]` tag names, first-occurrence order, deduplicated.
pub fn tags(source: &str) -> Vec<SmolStr> {
    let mut seen = Vec::new();
    for caps in grammar::TAG_SCAN.captures_iter(source) {
        if let Some(name) = caps.get(1) {
            let name = name.as_str();
            if !seen.iter().any(|t: &SmolStr| t == name) {
                seen.push(name.to_smolstr());
            }
        }
    }
    seen
}

/// One `@date [Title|reminder]` calendar event found in page content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub date: SmolStr,
    pub start: Option<SmolStr>,
    pub end: Option<SmolStr>,
    pub title: SmolStr,
    pub reminder: Option<SmolStr>,
}

/// Scan for calendar events; dates are separator-normalized.
pub fn calendar_events(source: &str) -> Vec<CalendarEvent> {
    grammar::EVENT_SCAN
        .captures_iter(source)
        .map(|caps| CalendarEvent {
            date: grammar::normalize_date(&caps[1]).into(),
            start: caps.get(2).map(|m| m.as_str().to_smolstr()),
            end: caps.get(3).map(|m| m.as_str().to_smolstr()),
            title: caps.get(4).map(|m| m.as_str()).unwrap_or("").to_smolstr(),
            reminder: caps
                .get(5)
                .map(|m| m.as_str().trim())
                .filter(|r| !r.is_empty())
                .map(|r| r.to_smolstr()),
        })
        .collect()
}

/// One fixed-form notice found in page content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeRef {
    pub condition: SmolStr,
    pub content: SmolStr,
}

/// Scan for fixed-form notices, fields trimmed.
pub fn notices(source: &str) -> Vec<NoticeRef> {
    grammar::NOTICE_SCAN
        .captures_iter(source)
        .map(|caps| NoticeRef {
            condition: caps[1].trim().to_smolstr(),
            content: caps[2].trim().to_smolstr(),
        })
        .collect()
}
