//! Maps parsed pieces to terminal lines.
//!
//! Markdown goes through a [`MarkdownConverter`]; each tag is looked up by
//! exact name in a [`RendererTable`]. A registered name without a renderer
//! renders nothing.

pub mod markdown;
pub mod tags;

use std::collections::HashMap;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Paragraph, Widget, Wrap},
};
use tracing::debug;

use crate::parser::{ContentPiece, TagPiece, TagStatus};

pub use markdown::{MarkdownConverter, PlainMarkdown};

/// What a tag renderer gets to see.
#[derive(Debug, Clone, Copy)]
pub struct TagView<'a> {
    pub tag: &'a TagPiece,
    pub status: TagStatus,
}

pub type TagRenderer = fn(&TagView) -> Vec<Line<'static>>;

// ── Renderer table ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RendererTable {
    renderers: HashMap<String, TagRenderer>,
}

impl RendererTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Renderers for the built-in vocabulary. `codiner-status` has none.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        table.register("think", tags::think);
        table.register("codiner-write", tags::write);
        table.register("codiner-edit", tags::edit);
        table.register("codiner-search-replace", tags::search_replace);
        table.register("codiner-rename", tags::rename);
        table.register("codiner-delete", tags::delete);
        table.register("codiner-read", tags::read);
        table.register("codiner-list-files", tags::list_files);
        table.register("codiner-grep", tags::grep);
        table.register("codiner-add-dependency", tags::add_dependency);
        table.register("codiner-add-integration", tags::add_integration);
        table.register("codiner-execute-sql", tags::execute_sql);
        table.register("codiner-database-schema", tags::database_schema);
        table.register("codiner-command", tags::command);
        table.register("codiner-output", tags::output);
        table.register("codiner-problem-report", tags::problem_report);
        table.register("codiner-chat-summary", tags::chat_summary);
        table.register("codiner-codebase-context", tags::codebase_context);
        table.register("codiner-web-search", tags::web_search);
        table.register("codiner-web-search-result", tags::search_result);
        table.register("codiner-web-crawl", tags::web_crawl);
        table.register("codiner-code-search", tags::code_search);
        table.register("codiner-code-search-result", tags::search_result);
        table.register("codiner-mcp-tool-call", tags::mcp_tool_call);
        table
    }

    pub fn register(&mut self, tag_name: impl Into<String>, renderer: TagRenderer) {
        self.renderers.insert(tag_name.into(), renderer);
    }

    pub fn get(&self, tag_name: &str) -> Option<TagRenderer> {
        self.renderers.get(tag_name).copied()
    }

    pub fn render_tag(&self, tag: &TagPiece, stream_active: bool) -> Vec<Line<'static>> {
        let Some(renderer) = self.get(&tag.tag_name) else {
            debug!(tag = %tag.tag_name, "no renderer registered");
            return Vec::new();
        };
        renderer(&TagView { tag, status: tag.status(stream_active) })
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

pub fn render_pieces(
    pieces: &[ContentPiece],
    stream_active: bool,
    table: &RendererTable,
    markdown: &dyn MarkdownConverter,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for piece in pieces {
        match piece {
            ContentPiece::Markdown { text } => lines.extend(markdown.convert(text)),
            ContentPiece::Tag(tag) => lines.extend(table.render_tag(tag, stream_active)),
        }
    }
    lines
}

/// Draw rendered lines into an off-screen buffer, wrapping at `width`.
pub fn render_to_buffer(lines: Vec<Line<'static>>, width: u16, height: u16) -> Buffer {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .render(area, &mut buf);
    buf
}

/// Plain text of a line, styling dropped.
pub fn line_text(line: &Line) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}
