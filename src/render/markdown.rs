use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Turns a markdown span into terminal lines.
pub trait MarkdownConverter {
    fn convert(&self, text: &str) -> Vec<Line<'static>>;
}

/// Line-oriented conversion: headings, bullets and fenced code get styling,
/// everything else is passed through as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainMarkdown;

impl MarkdownConverter for PlainMarkdown {
    fn convert(&self, text: &str) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let mut in_fence = false;
        for raw in text.lines() {
            let trimmed = raw.trim_start();
            if trimmed.starts_with("```") {
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                lines.push(Line::from(Span::styled(
                    format!("  {raw}"),
                    Style::default().fg(Color::Gray),
                )));
            } else if trimmed.starts_with('#') {
                let heading = trimmed.trim_start_matches('#').trim();
                lines.push(Line::from(Span::styled(
                    heading.to_string(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )));
            } else if let Some(item) = trimmed
                .strip_prefix("- ")
                .or_else(|| trimmed.strip_prefix("* "))
            {
                lines.push(Line::from(format!("• {item}")));
            } else {
                lines.push(Line::from(raw.to_string()));
            }
        }
        lines
    }
}
