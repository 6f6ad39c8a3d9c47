use tracing::{debug, trace};

use super::attributes::parse_attributes;
use super::preprocess::InProgress;
use super::registry::TagRegistry;
use super::{ContentPiece, TagPiece};

/// Split preprocessed text into markdown spans and tag occurrences.
///
/// An opening tag pairs with the first `</name>` of the same name after it.
/// A tag is in progress when the closer it pairs with is one of the appended
/// ones. Appended closers nothing paired with are dropped.
/// Tags of other names inside the content are left as literal text. When the
/// content of a tag contains another tag of the same name, the inner closer
/// ends the outer tag early; the remainder falls through to markdown.
pub fn segment(
    processed_text: &str,
    registry: &TagRegistry,
    in_progress: &InProgress,
) -> Vec<ContentPiece> {
    let mut pieces = Vec::new();
    let mut cursor = 0;

    if let Some(patterns) = registry.patterns() {
        let mut search_from = 0;
        while search_from < processed_text.len() {
            let Some(caps) = patterns.open.captures_at(processed_text, search_from) else {
                break;
            };
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                break;
            };
            let tag_name = name.as_str();
            let closer = format!("</{tag_name}>");
            let body_start = whole.end();

            let Some(body_len) = processed_text[body_start..].find(&closer) else {
                // No closer anywhere after this opener: it stays literal text.
                trace!(tag = tag_name, offset = whole.start(), "opener without closer");
                search_from = whole.start() + 1;
                continue;
            };

            push_markdown(&mut pieces, &processed_text[cursor..whole.start()]);

            let close_start = body_start + body_len;
            let raw_attributes = caps.get(2).map_or("", |m| m.as_str());
            pieces.push(ContentPiece::Tag(TagPiece {
                tag_name: tag_name.to_string(),
                attributes: parse_attributes(raw_attributes),
                inner_content: processed_text[body_start..close_start].to_string(),
                start_offset: whole.start(),
                in_progress: in_progress.is_synthesized(close_start),
            }));

            cursor = close_start + closer.len();
            search_from = cursor;
        }
    }

    let written_len = in_progress.written_len(processed_text.len());
    push_markdown(&mut pieces, &processed_text[cursor.min(written_len)..written_len]);
    debug!(pieces = pieces.len(), "segmented response");
    pieces
}

fn push_markdown(pieces: &mut Vec<ContentPiece>, text: &str) {
    if !text.is_empty() {
        pieces.push(ContentPiece::Markdown { text: text.to_string() });
    }
}
