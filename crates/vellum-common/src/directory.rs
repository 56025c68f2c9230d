//! Read-only directories supplied by the host application.
//!
//! The core never mutates these; it resolves page links against the page
//! directory and calc display names/units against the variable directory.
//! Both arrive from the host's JSON API, hence the serde derives.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// What kind of view a page opens as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    #[default]
    Doc,
    Calendar,
    Tracker,
    Graph,
}

/// Summary of one page, as listed by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub icon: SmolStr,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub page_type: PageType,
    #[serde(default)]
    pub is_pinned: bool,
}

/// The host's page list, wrapped for link resolution.
#[derive(Debug, Clone, Default)]
pub struct PageDirectory {
    pages: Vec<PageSummary>,
}

impl PageDirectory {
    pub fn new(pages: Vec<PageSummary>) -> Self {
        Self { pages }
    }

    /// Resolve a page-link target by exact trimmed-title match.
    ///
    /// A miss is not an error; callers degrade to broken-link styling.
    pub fn resolve(&self, title: &str) -> Option<&PageSummary> {
        let wanted = title.trim();
        self.pages.iter().find(|p| p.title.trim() == wanted)
    }

    /// First page of type `calendar`, used as the target of time links.
    pub fn calendar_page(&self) -> Option<&PageSummary> {
        self.pages.iter().find(|p| p.page_type == PageType::Calendar)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageSummary> {
        self.pages.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }
}

impl From<Vec<PageSummary>> for PageDirectory {
    fn from(pages: Vec<PageSummary>) -> Self {
        Self::new(pages)
    }
}

/// One trackable variable, as defined by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: SmolStr,
    #[serde(default)]
    pub display_name: SmolStr,
    #[serde(default)]
    pub unit: SmolStr,
    #[serde(default)]
    pub color: SmolStr,
    #[serde(default)]
    pub chart_type: SmolStr,
}

/// The host's variable list, wrapped for calc-chip lookups.
#[derive(Debug, Clone, Default)]
pub struct VariableDirectory {
    variables: Vec<Variable>,
}

impl VariableDirectory {
    pub fn new(variables: Vec<Variable>) -> Self {
        Self { variables }
    }

    pub fn get(&self, code: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == code)
    }

    /// Display name for a variable code, falling back to the code itself.
    pub fn display_name<'a>(&'a self, code: &'a str) -> &'a str {
        match self.get(code) {
            Some(v) if !v.display_name.is_empty() => v.display_name.as_str(),
            _ => code,
        }
    }

    /// Unit for a variable code; absent entries have no unit.
    pub fn unit(&self, code: &str) -> &str {
        self.get(code).map(|v| v.unit.as_str()).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }
}

impl From<Vec<Variable>> for VariableDirectory {
    fn from(variables: Vec<Variable>) -> Self {
        Self::new(variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(id: u64, title: &str, page_type: PageType) -> PageSummary {
        PageSummary {
            id,
            title: title.into(),
            icon: "📄".into(),
            cover: String::new(),
            content: String::new(),
            page_type,
            is_pinned: false,
        }
    }

    #[test]
    fn resolve_trims_both_sides() {
        let dir = PageDirectory::new(vec![page(1, "  Alpha ", PageType::Doc)]);
        assert_eq!(dir.resolve("Alpha").map(|p| p.id), Some(1));
        assert_eq!(dir.resolve(" Alpha  ").map(|p| p.id), Some(1));
        assert!(dir.resolve("Beta").is_none());
    }

    #[test]
    fn calendar_page_discovery() {
        let dir = PageDirectory::new(vec![
            page(1, "Notes", PageType::Doc),
            page(2, "Calendar", PageType::Calendar),
        ]);
        assert_eq!(dir.calendar_page().map(|p| p.id), Some(2));
    }

    #[test]
    fn variable_lookup_falls_back_to_code() {
        let dir = VariableDirectory::new(vec![Variable {
            name: "calc_money".into(),
            display_name: "Spending".into(),
            unit: "$".into(),
            color: "#4F46E5".into(),
            chart_type: "line".into(),
        }]);
        assert_eq!(dir.display_name("calc_money"), "Spending");
        assert_eq!(dir.unit("calc_money"), "$");
        assert_eq!(dir.display_name("calc_steps"), "calc_steps");
        assert_eq!(dir.unit("calc_steps"), "");
    }

    #[test]
    fn deserializes_host_json() {
        let json = r#"[
            {"id": 3, "title": "Daily Tracker", "icon": "⏱️", "page_type": "tracker"},
            {"id": 5, "title": "Global Calendar", "page_type": "calendar", "is_pinned": true}
        ]"#;
        let pages: Vec<PageSummary> = serde_json::from_str(json).unwrap();
        let dir = PageDirectory::new(pages);
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.calendar_page().map(|p| p.id), Some(5));
    }
}
