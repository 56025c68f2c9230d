//! vellum-renderer: the markdown extension pipeline.
//!
//! Raw text goes through three passes:
//! 1. tokenizer - recognizers claim spans in a fixed precedence order
//! 2. expansion - each claimed span is replaced by rendered markup (static
//!    HTML for fixed forms, widget skeletons for builder forms); unclaimed
//!    text passes through verbatim so markdown spanning token boundaries
//!    keeps working
//! 3. baseline - one `pulldown-cmark` pass over the expanded document
//!
//! Widget interactions flow backward through `vellum-editor-core`, which
//! patches the raw source and triggers a fresh render.

use pulldown_cmark::{Options, Parser};
use pulldown_cmark_escape::FmtWriter;

pub mod calc;
pub mod context;
pub mod extract;
pub mod grammar;
pub mod html;
pub mod todo;
pub mod token;
pub mod widget;

pub use context::RenderContext;
pub use extract::{CalendarEvent, NoticeRef, calendar_events, notices, page_links, tags};
pub use todo::{TodoItem, TodoStatus};
pub use token::{CalcParams, MediaKind, NoticeParams, Spanned, Token, TodoBlock, tokenize};
pub use widget::{WidgetId, WidgetKind, WidgetRegistry, WidgetSession};

/// Result of one render pass: the HTML snapshot plus the widget sessions
/// the host needs to wire up.
#[derive(Debug)]
pub struct RenderOutput {
    pub html: String,
    pub widgets: Vec<WidgetSession>,
}

#[derive(thiserror::Error, Debug, miette::Diagnostic)]
pub enum RenderError {
    /// The output writer failed. Malformed *content* never errors - broken
    /// links and bad expressions degrade visually instead.
    #[error("failed to write rendered output")]
    #[diagnostic(code(vellum::render::write))]
    Write(#[from] std::fmt::Error),
}

fn baseline_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH
}

/// Full pipeline entry point: one source snapshot in, one HTML snapshot out.
pub fn render(source: &str, ctx: &RenderContext<'_>) -> Result<RenderOutput, RenderError> {
    let tokens = token::tokenize(source);
    let (expanded, registry) = expand(source, &tokens, ctx)?;

    let parser = Parser::new_ext(&expanded, baseline_options());
    let mut out = String::with_capacity(expanded.len() + expanded.len() / 4);
    pulldown_cmark::html::push_html(&mut out, parser);

    Ok(RenderOutput {
        html: out,
        widgets: registry.into_sessions(),
    })
}

/// The expansion pass: substitute rendered markup for every claimed span.
fn expand(
    source: &str,
    tokens: &[Spanned<'_>],
    ctx: &RenderContext<'_>,
) -> Result<(String, WidgetRegistry), RenderError> {
    let mut expanded = String::with_capacity(source.len() + tokens.len() * 64);
    let mut writer = html::TokenWriter::new(FmtWriter(&mut expanded), ctx);

    let mut cursor = 0;
    for spanned in tokens {
        writer.text(&source[cursor..spanned.span.start])?;
        writer.token(spanned)?;
        cursor = spanned.span.end;
    }
    writer.text(&source[cursor..])?;

    let registry = writer.into_registry();
    Ok((expanded, registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_common::{PageDirectory, VariableDirectory};

    #[test]
    fn expansion_preserves_untokenized_text() {
        let pages = PageDirectory::default();
        let variables = VariableDirectory::default();
        let ctx = RenderContext::new(&pages, &variables);

        let source = "plain *markdown* with no extensions";
        let tokens = tokenize(source);
        let (expanded, registry) = expand(source, &tokens, &ctx).unwrap();
        assert_eq!(expanded, source);
        assert!(registry.sessions().is_empty());
    }

    #[test]
    fn expansion_replaces_only_claimed_spans() {
        let pages = PageDirectory::default();
        let variables = VariableDirectory::default();
        let ctx = RenderContext::new(&pages, &variables);

        let source = "before [[Work]] after";
        let tokens = tokenize(source);
        let (expanded, _) = expand(source, &tokens, &ctx).unwrap();
        assert!(expanded.starts_with("before "));
        assert!(expanded.ends_with(" after"));
        assert!(expanded.contains("<span class=\"wiki-tag\">#Work</span>"));
    }
}
