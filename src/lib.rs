pub mod config;
pub mod parser;
pub mod render;
pub mod replay;

pub use config::{init_logging, ReplayConfig};
pub use parser::{
    parse, parse_attributes, parse_with, preprocess, resolve_status, segment, tags_named,
    AttributeMap, ContentPiece, TagPiece, TagRegistry, TagStatus,
};
pub use render::{render_pieces, render_to_buffer, PlainMarkdown, RendererTable};

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

pub fn read_response(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read response from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read response at {}", path.display()))
}

// ── parse ─────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum PieceOutput<'a> {
    Markdown {
        text: &'a str,
    },
    Tag {
        #[serde(flatten)]
        tag: &'a TagPiece,
        status: TagStatus,
    },
}

/// Pieces of `text` as JSON, each tag carrying its resolved status.
pub fn parse_json(text: &str, stream_active: bool, pretty: bool) -> Result<String> {
    let pieces = parse(text);
    let output: Vec<PieceOutput> = pieces
        .iter()
        .map(|piece| match piece {
            ContentPiece::Markdown { text } => PieceOutput::Markdown { text },
            ContentPiece::Tag(tag) => PieceOutput::Tag { tag, status: tag.status(stream_active) },
        })
        .collect();
    let json = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    Ok(json)
}

pub fn parse_file(path: &Path, stream_active: bool, pretty: bool) -> Result<()> {
    let text = read_response(path)?;
    println!("{}", parse_json(&text, stream_active, pretty)?);
    Ok(())
}

// ── render ────────────────────────────────────────────────────────────────────

/// Rendered terminal lines of `text` as plain strings.
pub fn render_text(text: &str, stream_active: bool) -> Vec<String> {
    let pieces = parse(text);
    render_pieces(&pieces, stream_active, &RendererTable::builtin(), &PlainMarkdown)
        .iter()
        .map(render::line_text)
        .collect()
}

pub fn render_file(path: &Path, stream_active: bool) -> Result<()> {
    let text = read_response(path)?;
    for line in render_text(&text, stream_active) {
        println!("{line}");
    }
    Ok(())
}

// ── replay ────────────────────────────────────────────────────────────────────

fn status_summary(statuses: &[(String, TagStatus)]) -> String {
    statuses
        .iter()
        .map(|(name, status)| format!("{name}:{}", status.label()))
        .collect::<Vec<_>>()
        .join(" ")
}

pub async fn replay_file(path: &Path, config: ReplayConfig) -> Result<()> {
    let text = read_response(path)?;
    let outcome = replay::replay(&text, config).await?;
    for frame in &outcome.frames {
        println!(
            "#{:<4} {:>7}B  pieces={:<3} {}",
            frame.chunk_index,
            frame.received_len,
            frame.pieces.len(),
            status_summary(&frame.statuses())
        );
    }
    println!(
        "stream {}: {}",
        if outcome.completed { "completed" } else { "aborted" },
        status_summary(&outcome.final_statuses())
    );
    Ok(())
}

// ── tags ──────────────────────────────────────────────────────────────────────

pub fn tags() -> Result<()> {
    for name in TagRegistry::builtin().names() {
        println!("{name}");
    }
    Ok(())
}
