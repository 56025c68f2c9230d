//! Token recognizers.
//!
//! The tokenizer scans the raw source once, trying the recognizers at each
//! candidate position in a fixed precedence order; the first match claims the
//! span. Everything between tokens is left for the baseline markdown engine.
//!
//! Tokens are ephemeral: they live for one render pass and carry no identity
//! across renders except through their source text. Each `Spanned` holds the
//! exact matched substring, so substituting `raw` back at `span` reproduces
//! the original source byte for byte.

use std::ops::Range;

use smol_str::SmolStr;

use crate::grammar;
use crate::todo::{self, TodoItem};

/// Media component subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

/// Fixed-form notice parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeParams<'a> {
    pub condition: &'a str,
    pub content: &'a str,
}

/// Fixed-form calc parameters. `name:expr` splits on the first colon; a
/// payload with no colon yields empty name and expression, which renders as
/// an unresolvable chip rather than rejecting the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalcParams<'a> {
    pub var_name: &'a str,
    pub expression: &'a str,
}

/// A parsed `{{TODO}}` block: the raw body plus its recognized items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoBlock<'a> {
    pub body: &'a str,
    pub items: Vec<TodoItem>,
}

/// One recognized construct.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// `[[Name]]`
    Tag { name: &'a str },
    /// `[[@Title]]`
    PageLink { target: &'a str },
    /// `@YYYY-MM-DD[ HH:MM[-HH:MM]]`; `date` is separator-normalized.
    TimeLink {
        date: SmolStr,
        time: Option<&'a str>,
        end_time: Option<&'a str>,
    },
    /// `{{TODO}}` .. `{{/TODO}}`
    Todo(TodoBlock<'a>),
    /// `{{notice}}` (None = builder form) or `{{notice|cond|content}}`.
    Notice(Option<NoticeParams<'a>>),
    /// `{{calc}}` (None = builder form) or `{{calc|name:expr}}`.
    Calc(Option<CalcParams<'a>>),
    /// `{{image}}` / `{{video}}`, `url` None = upload placeholder.
    Media {
        kind: MediaKind,
        url: Option<&'a str>,
    },
}

/// A token plus the exact source slice it claimed.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<'a> {
    pub token: Token<'a>,
    pub raw: &'a str,
    pub span: Range<usize>,
}

/// Scan the whole source, producing tokens in source order.
pub fn tokenize(source: &str) -> Vec<Spanned<'_>> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < source.len() {
        // Every construct opens with `{`, `[` or `@`; UTF-8 continuation
        // bytes never equal those, so a byte-wise advance is safe.
        match bytes[pos] {
            b'{' | b'[' | b'@' => {
                if let Some(spanned) = recognize_at(source, pos) {
                    pos = spanned.span.end;
                    tokens.push(spanned);
                    continue;
                }
            }
            _ => {}
        }
        pos += 1;
    }

    tracing::trace!(count = tokens.len(), "tokenized source");
    tokens
}

/// Try the recognizers at one position, in precedence order. Precedence
/// matters: the to-do block and notice/calc forms must win over the media
/// catch-all on `{{`, and `[[@` must win over the plain-tag `[[`.
fn recognize_at(source: &str, pos: usize) -> Option<Spanned<'_>> {
    let rest = &source[pos..];

    // Block-level: only at the start of a line.
    if pos == 0 || source.as_bytes()[pos - 1] == b'\n' {
        if let Some(caps) = grammar::AT_TODO_BLOCK.captures(rest) {
            let m = caps.get(0)?;
            let body = caps.get(1)?.as_str();
            return Some(spanned(
                Token::Todo(TodoBlock {
                    body,
                    items: todo::parse_items(body),
                }),
                source,
                pos,
                m.end(),
            ));
        }
    }

    if let Some(caps) = grammar::AT_NOTICE.captures(rest) {
        let m = caps.get(0)?;
        let params = caps.get(1).map(|cond| NoticeParams {
            condition: cond.as_str(),
            content: caps.get(2).map(|c| c.as_str()).unwrap_or(""),
        });
        return Some(spanned(Token::Notice(params), source, pos, m.end()));
    }

    if let Some(caps) = grammar::AT_CALC.captures(rest) {
        let m = caps.get(0)?;
        let params = caps.get(1).map(|payload| split_calc(payload.as_str()));
        return Some(spanned(Token::Calc(params), source, pos, m.end()));
    }

    if let Some(caps) = grammar::AT_PAGE_LINK.captures(rest) {
        let m = caps.get(0)?;
        let target = caps.get(1)?.as_str();
        return Some(spanned(Token::PageLink { target }, source, pos, m.end()));
    }

    if let Some(caps) = grammar::AT_TAG.captures(rest) {
        let m = caps.get(0)?;
        let name = caps.get(1)?.as_str();
        return Some(spanned(Token::Tag { name }, source, pos, m.end()));
    }

    if let Some(caps) = grammar::AT_TIME_LINK.captures(rest) {
        let m = caps.get(0)?;
        let date = grammar::normalize_date(&caps[1]).into();
        let time = caps.get(2).map(|c| c.as_str());
        let end_time = caps.get(3).map(|c| c.as_str());
        return Some(spanned(
            Token::TimeLink { date, time, end_time },
            source,
            pos,
            m.end(),
        ));
    }

    if let Some(caps) = grammar::AT_MEDIA.captures(rest) {
        let m = caps.get(0)?;
        let kind = match &caps[1] {
            "image" => MediaKind::Image,
            _ => MediaKind::Video,
        };
        let url = caps.get(2).map(|c| c.as_str()).filter(|u| !u.is_empty());
        return Some(spanned(Token::Media { kind, url }, source, pos, m.end()));
    }

    None
}

fn spanned<'a>(token: Token<'a>, source: &'a str, pos: usize, len: usize) -> Spanned<'a> {
    let span = pos..pos + len;
    Spanned {
        token,
        raw: &source[span.clone()],
        span,
    }
}

fn split_calc(payload: &str) -> CalcParams<'_> {
    match payload.split_once(':') {
        Some((name, expr)) => CalcParams {
            var_name: name.trim(),
            expression: expr.trim(),
        },
        None => CalcParams {
            var_name: "",
            expression: "",
        },
    }
}
