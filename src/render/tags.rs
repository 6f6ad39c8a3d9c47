use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use super::TagView;
use crate::parser::TagStatus;

// ── Shared pieces ─────────────────────────────────────────────────────────────

fn status_span(status: TagStatus) -> Span<'static> {
    match status {
        TagStatus::Finished => Span::styled(" ✓ ", Style::default().fg(Color::Green)),
        TagStatus::Pending  => Span::styled(" … ", Style::default().fg(Color::Yellow)),
        TagStatus::Aborted  => Span::styled(" ✗ ", Style::default().fg(Color::Red)),
    }
}

/// `[icon] Title detail`, with a trailing marker for aborted tags.
fn header(view: &TagView, title: &str, detail: &str) -> Line<'static> {
    let mut spans = vec![
        status_span(view.status),
        Span::styled(
            title.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
    ];
    if !detail.is_empty() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(detail.to_string(), Style::default().fg(Color::White)));
    }
    if view.status == TagStatus::Aborted {
        spans.push(Span::styled(" (aborted)", Style::default().fg(Color::Red)));
    }
    Line::from(spans)
}

fn body(content: &str, style: Style) -> Vec<Line<'static>> {
    content
        .trim_matches('\n')
        .lines()
        .map(|line| Line::from(Span::styled(format!("   {line}"), style)))
        .collect()
}

fn code_style() -> Style {
    Style::default().fg(Color::Gray)
}

fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}

// ── Renderers ─────────────────────────────────────────────────────────────────

pub fn think(view: &TagView) -> Vec<Line<'static>> {
    let title = if view.status == TagStatus::Pending { "Thinking" } else { "Thought" };
    let mut lines = vec![header(view, title, "")];
    lines.extend(body(&view.tag.inner_content, muted().add_modifier(Modifier::ITALIC)));
    lines
}

pub fn write(view: &TagView) -> Vec<Line<'static>> {
    let mut lines = vec![header(view, "Write", view.tag.attr("path"))];
    let description = view.tag.attr("description");
    if !description.is_empty() {
        lines.push(Line::from(Span::styled(format!("   {description}"), muted())));
    }
    lines.extend(body(&view.tag.inner_content, code_style()));
    lines
}

pub fn edit(view: &TagView) -> Vec<Line<'static>> {
    let mut lines = vec![header(view, "Edit", view.tag.attr("path"))];
    lines.extend(body(&view.tag.inner_content, code_style()));
    lines
}

pub fn search_replace(view: &TagView) -> Vec<Line<'static>> {
    let mut lines = vec![header(view, "Search & replace", view.tag.attr("path"))];
    lines.extend(body(&view.tag.inner_content, code_style()));
    lines
}

pub fn rename(view: &TagView) -> Vec<Line<'static>> {
    let detail = format!("{} → {}", view.tag.attr("from"), view.tag.attr("to"));
    vec![header(view, "Rename", &detail)]
}

pub fn delete(view: &TagView) -> Vec<Line<'static>> {
    vec![header(view, "Delete", view.tag.attr("path"))]
}

pub fn read(view: &TagView) -> Vec<Line<'static>> {
    vec![header(view, "Read", view.tag.attr("path"))]
}

pub fn list_files(view: &TagView) -> Vec<Line<'static>> {
    vec![header(view, "List files", view.tag.attr("directory"))]
}

pub fn grep(view: &TagView) -> Vec<Line<'static>> {
    let detail = format!("{} {}", view.tag.attr("pattern"), view.tag.attr("path"));
    let mut lines = vec![header(view, "Grep", detail.trim())];
    lines.extend(body(&view.tag.inner_content, muted()));
    lines
}

pub fn add_dependency(view: &TagView) -> Vec<Line<'static>> {
    vec![header(view, "Add dependency", view.tag.attr("packages"))]
}

pub fn add_integration(view: &TagView) -> Vec<Line<'static>> {
    vec![header(view, "Add integration", view.tag.attr("provider"))]
}

pub fn execute_sql(view: &TagView) -> Vec<Line<'static>> {
    let mut lines = vec![header(view, "SQL", view.tag.attr("description"))];
    lines.extend(body(&view.tag.inner_content, code_style()));
    lines
}

pub fn database_schema(view: &TagView) -> Vec<Line<'static>> {
    let mut lines = vec![header(view, "Database schema", view.tag.attr("table"))];
    lines.extend(body(&view.tag.inner_content, code_style()));
    lines
}

pub fn command(view: &TagView) -> Vec<Line<'static>> {
    let cmd = view.tag.inner_content.trim();
    vec![
        header(view, "Command", view.tag.attr("cwd")),
        Line::from(Span::styled(format!("   $ {cmd}"), code_style())),
    ]
}

pub fn output(view: &TagView) -> Vec<Line<'static>> {
    let kind = view.tag.attr("type");
    let color = match kind {
        "error"   => Color::Red,
        "warning" => Color::Yellow,
        _         => Color::Gray,
    };
    let title = if kind.is_empty() { "Output".to_string() } else { format!("Output ({kind})") };
    let mut lines = vec![header(view, &title, view.tag.attr("message"))];
    lines.extend(body(&view.tag.inner_content, Style::default().fg(color)));
    lines
}

pub fn problem_report(view: &TagView) -> Vec<Line<'static>> {
    let mut lines = vec![header(view, "Problems", view.tag.attr("summary"))];
    lines.extend(body(&view.tag.inner_content, Style::default().fg(Color::Yellow)));
    lines
}

pub fn chat_summary(view: &TagView) -> Vec<Line<'static>> {
    vec![header(view, "Summary", view.tag.inner_content.trim())]
}

pub fn codebase_context(view: &TagView) -> Vec<Line<'static>> {
    vec![header(view, "Codebase context", view.tag.attr("files"))]
}

pub fn web_search(view: &TagView) -> Vec<Line<'static>> {
    vec![header(view, "Web search", view.tag.inner_content.trim())]
}

pub fn code_search(view: &TagView) -> Vec<Line<'static>> {
    vec![header(view, "Code search", view.tag.inner_content.trim())]
}

pub fn web_crawl(view: &TagView) -> Vec<Line<'static>> {
    vec![header(view, "Crawl", view.tag.inner_content.trim())]
}

/// Search results are collapsed to a count of non-blank lines.
pub fn search_result(view: &TagView) -> Vec<Line<'static>> {
    let count = view
        .tag
        .inner_content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .count();
    vec![header(view, "Results", &format!("{count} lines"))]
}

pub fn mcp_tool_call(view: &TagView) -> Vec<Line<'static>> {
    let detail = format!("{}/{}", view.tag.attr("server"), view.tag.attr("tool"));
    let mut lines = vec![header(view, "Tool call", &detail)];
    lines.extend(body(&view.tag.inner_content, code_style()));
    lines
}
