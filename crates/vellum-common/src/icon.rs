//! Page-icon helpers for the `emoji||` hidden-mode convention.
//!
//! An icon of the form `📦||archive` marks a page as hidden-mode: the host
//! suppresses the cover and icon chrome. The text after `||` is a private
//! label and never displayed.

use regex::Regex;
use std::sync::LazyLock;

static HIDDEN_ICON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Emoji}+\|\|").expect("hidden-icon pattern"));

/// Whether an icon string uses the `emoji||` hidden-mode prefix.
pub fn is_hidden_mode(icon: &str) -> bool {
    HIDDEN_ICON_RE.is_match(icon)
}

/// Strip the `||` suffix from an icon, falling back to the default page icon.
pub fn clean_icon(icon: &str) -> &str {
    if icon.is_empty() {
        return "📄";
    }
    match icon.split_once("||") {
        Some((head, _)) => head,
        None => icon,
    }
}
