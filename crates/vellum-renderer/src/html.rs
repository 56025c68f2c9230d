//! Per-token markup emitters.
//!
//! Fixed-form tokens render static markup; builder forms render interactive
//! skeletons and register a widget session. Everything interpolated from the
//! source or the directories goes through `escape_html`/`escape_href`.
//!
//! Emitted markup never contains newlines: block-level widgets are
//! substituted at line starts and must remain a single HTML block for the
//! baseline engine.

use std::ops::Range;

use pulldown_cmark_escape::{StrWrite, escape_href, escape_html};

use crate::calc;
use crate::context::RenderContext;
use crate::token::{CalcParams, MediaKind, NoticeParams, Spanned, Token, TodoBlock};
use crate::widget::{WidgetKind, WidgetRegistry};

/// Writes expanded output for one render pass, collecting widget sessions
/// along the way.
pub(crate) struct TokenWriter<'a, W: StrWrite> {
    writer: W,
    ctx: &'a RenderContext<'a>,
    registry: WidgetRegistry,
}

impl<'a, W: StrWrite> TokenWriter<'a, W> {
    pub(crate) fn new(writer: W, ctx: &'a RenderContext<'a>) -> Self {
        Self {
            writer,
            ctx,
            registry: WidgetRegistry::default(),
        }
    }

    pub(crate) fn into_registry(self) -> WidgetRegistry {
        self.registry
    }

    /// Pass a plain source segment through untouched.
    pub(crate) fn text(&mut self, segment: &str) -> Result<(), W::Error> {
        self.writer.write_str(segment)
    }

    pub(crate) fn token(&mut self, spanned: &Spanned<'_>) -> Result<(), W::Error> {
        match &spanned.token {
            Token::Tag { name } => self.tag(name),
            Token::PageLink { target } => self.page_link(target),
            Token::TimeLink {
                date,
                time,
                end_time,
            } => self.time_link(date, *time, *end_time),
            Token::Todo(block) => self.todo_list(block, spanned.span.clone()),
            Token::Notice(Some(params)) => self.notice_block(params),
            Token::Notice(None) => self.notice_builder(spanned.span.clone()),
            Token::Calc(Some(params)) => self.calc_chip(params),
            Token::Calc(None) => self.calc_builder(spanned.span.clone()),
            Token::Media { kind, url } => match url {
                Some(url) => self.media_embed(*kind, url),
                None => self.media_placeholder(*kind, spanned.span.clone()),
            },
        }
    }

    fn write(&mut self, s: &str) -> Result<(), W::Error> {
        self.writer.write_str(s)
    }

    fn tag(&mut self, name: &str) -> Result<(), W::Error> {
        self.write("<span class=\"wiki-tag\">#")?;
        escape_html(&mut self.writer, name)?;
        self.write("</span>")
    }

    fn page_link(&mut self, target: &str) -> Result<(), W::Error> {
        match self.ctx.pages.resolve(target) {
            Some(page) => {
                let href = format!("/p/{}", page.id);
                self.write("<a class=\"page-link\" href=\"")?;
                escape_href(&mut self.writer, &href)?;
                self.write("\" title=\"go to ")?;
                escape_html(&mut self.writer, target.trim())?;
                self.write("\">@")?;
                escape_html(&mut self.writer, target)?;
                self.write("</a>")
            }
            None => {
                tracing::debug!(title = target, "page link did not resolve");
                self.write("<a class=\"page-link broken\" href=\"#\" title=\"page not found\">@")?;
                escape_html(&mut self.writer, target)?;
                self.write("</a>")
            }
        }
    }

    fn calendar_href(&self, date: &str) -> Option<String> {
        self.ctx
            .pages
            .calendar_page()
            .map(|page| format!("/p/{}?view=day&date={}", page.id, date))
    }

    fn time_link(
        &mut self,
        date: &str,
        time: Option<&str>,
        end_time: Option<&str>,
    ) -> Result<(), W::Error> {
        self.write("<a class=\"time-link\" href=\"")?;
        match self.calendar_href(date) {
            Some(href) => escape_href(&mut self.writer, &href)?,
            None => self.write("#")?,
        }
        self.write("\">📅 ")?;
        escape_html(&mut self.writer, date)?;
        if let Some(time) = time {
            self.write(" ")?;
            escape_html(&mut self.writer, time)?;
            if let Some(end) = end_time {
                self.write("-")?;
                escape_html(&mut self.writer, end)?;
            }
        }
        self.write("</a>")
    }

    fn todo_list(&mut self, block: &TodoBlock<'_>, span: Range<usize>) -> Result<(), W::Error> {
        let id = self.registry.register(WidgetKind::TodoList, span);
        write!(&mut self.writer, "<div class=\"todo-list\" data-widget-id=\"{id}\">")?;

        for (index, item) in block.items.iter().enumerate() {
            let status = item.status.as_str();
            write!(
                &mut self.writer,
                "<div class=\"todo-item {status}\" data-item-index=\"{index}\" data-status=\"{status}\">",
            )?;
            write!(
                &mut self.writer,
                "<span class=\"todo-toggle\">{}</span>",
                item.status.glyph()
            )?;
            self.write("<span class=\"todo-text\">")?;
            escape_html(&mut self.writer, &item.text)?;
            self.write("</span>")?;

            if let Some(due) = &item.due {
                self.write(" <a class=\"todo-due\" href=\"")?;
                match self.calendar_href(due) {
                    Some(href) => escape_href(&mut self.writer, &href)?,
                    None => self.write("#")?,
                }
                self.write("\">📅 ")?;
                // Display form uses dotted dates, the source keeps dashes.
                escape_html(&mut self.writer, &due.replace('-', "."))?;
                self.write("</a>")?;
            }

            if let Some(link) = &item.link {
                match self.ctx.pages.resolve(link) {
                    Some(page) => {
                        let href = format!("/p/{}", page.id);
                        self.write(" <a class=\"todo-link\" href=\"")?;
                        escape_href(&mut self.writer, &href)?;
                        self.write("\">")?;
                    }
                    None => {
                        self.write(" <a class=\"todo-link missing\" href=\"#\">")?;
                    }
                }
                self.write("[[@")?;
                escape_html(&mut self.writer, link)?;
                self.write("]]</a>")?;
            }

            self.write("</div>")?;
        }

        self.write("</div>")
    }

    fn notice_block(&mut self, params: &NoticeParams<'_>) -> Result<(), W::Error> {
        self.write("<div class=\"notice-block\"><span class=\"notice-cond\">")?;
        escape_html(&mut self.writer, params.condition)?;
        self.write("</span><span class=\"notice-text\">")?;
        escape_html(&mut self.writer, params.content)?;
        self.write("</span></div>")
    }

    fn notice_builder(&mut self, span: Range<usize>) -> Result<(), W::Error> {
        let id = self.registry.register(WidgetKind::NoticeBuilder, span);
        write!(
            &mut self.writer,
            "<div class=\"notice-builder\" data-widget-id=\"{id}\">"
        )?;
        self.write(concat!(
            "<select class=\"notice-kind\">",
            "<option value=\"time\">Specific time (YYYY-MM-DD HH:MM)</option>",
            "<option value=\"daily\">Daily (HH:MM)</option>",
            "<option value=\"weekly\">Weekly (Mon HH:MM)</option>",
            "<option value=\"interval\">Interval (every N hours/minutes)</option>",
            "</select>",
            "<input class=\"notice-value\" placeholder=\"2026-02-18 14:00\"/>",
            "<input class=\"notice-content\" placeholder=\"Reminder content...\"/>",
            "<button class=\"notice-save\">Insert reminder</button>",
        ))?;
        self.write("</div>")
    }

    fn calc_chip(&mut self, params: &CalcParams<'_>) -> Result<(), W::Error> {
        self.write("<span class=\"calc-chip\" data-var=\"")?;
        escape_html(&mut self.writer, params.var_name)?;
        self.write("\" data-expr=\"")?;
        escape_html(&mut self.writer, params.expression)?;
        self.write("\"><span class=\"calc-chip-name\">")?;
        escape_html(&mut self.writer, self.ctx.variables.display_name(params.var_name))?;
        self.write("</span><span class=\"calc-chip-value\">")?;
        escape_html(&mut self.writer, &calc::display(params.expression))?;
        let unit = self.ctx.variables.unit(params.var_name);
        if !unit.is_empty() {
            self.write(" ")?;
            escape_html(&mut self.writer, unit)?;
        }
        self.write("</span></span>")
    }

    fn calc_builder(&mut self, span: Range<usize>) -> Result<(), W::Error> {
        let awaiting = self.ctx.variables.is_empty();
        let id = self.registry.register(
            WidgetKind::CalcBuilder {
                awaiting_variables: awaiting,
            },
            span,
        );
        write!(
            &mut self.writer,
            "<span class=\"calc-builder\" data-widget-id=\"{id}\">"
        )?;
        self.write("<select class=\"calc-variable\">")?;
        if awaiting {
            self.write("<option value=\"\" disabled selected>Loading variables...</option>")?;
        } else {
            self.write("<option value=\"\">-- select variable --</option>")?;
            for variable in self.ctx.variables.iter() {
                self.write("<option value=\"")?;
                escape_html(&mut self.writer, &variable.name)?;
                self.write("\">")?;
                escape_html(&mut self.writer, self.ctx.variables.display_name(&variable.name))?;
                self.write(" (")?;
                escape_html(&mut self.writer, &variable.unit)?;
                self.write(")</option>")?;
            }
        }
        self.write("</select>")?;
        self.write("<input class=\"calc-expression\" placeholder=\"70/100+20\"/>")?;
        self.write("<button class=\"calc-insert\">Insert</button>")?;
        self.write("</span>")
    }

    fn media_embed(&mut self, kind: MediaKind, url: &str) -> Result<(), W::Error> {
        match kind {
            MediaKind::Image => {
                self.write("<img class=\"media-embed\" src=\"")?;
                escape_href(&mut self.writer, url)?;
                self.write("\" alt=\"image\"/>")
            }
            MediaKind::Video => {
                self.write("<video class=\"media-embed\" src=\"")?;
                escape_href(&mut self.writer, url)?;
                self.write("\" controls></video>")
            }
        }
    }

    fn media_placeholder(&mut self, kind: MediaKind, span: Range<usize>) -> Result<(), W::Error> {
        let id = self.registry.register(WidgetKind::MediaUpload(kind), span);
        write!(
            &mut self.writer,
            "<div class=\"media-placeholder\" data-widget-id=\"{id}\" data-kind=\"{}\">",
            kind.as_str()
        )?;
        match kind {
            MediaKind::Image => self.write("Upload image")?,
            MediaKind::Video => self.write("Upload video")?,
        }
        self.write("</div>")
    }
}
