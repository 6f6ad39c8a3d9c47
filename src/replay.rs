use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::ReplayConfig;
use crate::parser::{parse, ContentPiece, TagStatus};

// ── Frames ────────────────────────────────────────────────────────────────────

/// Parser output after one chunk arrived, while the stream was still active.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayFrame {
    pub chunk_index: usize,
    pub received_len: usize,
    pub pieces: Vec<ContentPiece>,
}

impl ReplayFrame {
    pub fn statuses(&self) -> Vec<(String, TagStatus)> {
        tag_statuses(&self.pieces, true)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayOutcome {
    pub frames: Vec<ReplayFrame>,
    /// Everything received before the stream ended.
    pub text: String,
    /// `false` when generation was cancelled before the last chunk.
    pub completed: bool,
    pub final_pieces: Vec<ContentPiece>,
}

impl ReplayOutcome {
    /// Tag statuses once the stream is over; unclosed tags come out aborted.
    pub fn final_statuses(&self) -> Vec<(String, TagStatus)> {
        tag_statuses(&self.final_pieces, false)
    }
}

fn tag_statuses(pieces: &[ContentPiece], stream_active: bool) -> Vec<(String, TagStatus)> {
    pieces
        .iter()
        .filter_map(ContentPiece::as_tag)
        .map(|tag| (tag.tag_name.clone(), tag.status(stream_active)))
        .collect()
}

// ── Chunking ──────────────────────────────────────────────────────────────────

/// Split `text` into chunks of `chunk_size` characters.
pub fn split_chunks(text: &str, chunk_size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(chunk_size.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Send chunks down `tx` one at a time; `None` marks the end of the stream.
pub async fn stream_chunks(
    chunks: Vec<String>,
    config: ReplayConfig,
    tx: mpsc::UnboundedSender<Option<String>>,
    cancel: CancellationToken,
) {
    for chunk in chunks {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = tx.send(None);
                return;
            }
            _ = tokio::time::sleep(config.delay) => {}
        }
        if tx.send(Some(chunk)).is_err() {
            return;
        }
    }
    let _ = tx.send(None);
}

// ── Replay ────────────────────────────────────────────────────────────────────

/// Stream `text` through the parser chunk by chunk, re-parsing the whole
/// accumulated response after every chunk.
pub async fn replay(text: &str, config: ReplayConfig) -> Result<ReplayOutcome> {
    let chunks = split_chunks(text, config.chunk_size);
    let total = chunks.len();
    info!(chunks = chunks.len(), chunk_size = config.chunk_size, "replay started");

    let (tx, mut rx) = mpsc::unbounded_channel::<Option<String>>();
    let cancel = CancellationToken::new();
    let producer = tokio::spawn(stream_chunks(chunks, config.clone(), tx, cancel.clone()));

    let mut received = String::new();
    let mut frames = Vec::new();
    while let Some(Some(chunk)) = rx.recv().await {
        received.push_str(&chunk);
        frames.push(ReplayFrame {
            chunk_index: frames.len(),
            received_len: received.len(),
            pieces: parse(&received),
        });

        if config.abort_after == Some(frames.len()) && frames.len() < total {
            warn!(after = frames.len(), "cancelling generation");
            cancel.cancel();
            break;
        }
    }
    drop(rx);

    producer.await.context("chunk producer failed")?;

    let completed = !cancel.is_cancelled();
    info!(frames = frames.len(), completed, "replay finished");
    let final_pieces = parse(&received);
    Ok(ReplayOutcome { frames, text: received, completed, final_pieces })
}
