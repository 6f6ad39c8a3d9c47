//! Streaming parser for the pseudo-XML tool tags embedded in model responses.
//!
//! Every call parses the whole accumulated response from scratch; nothing is
//! carried between calls. Any input produces some list of pieces.

pub mod attributes;
pub mod preprocess;
pub mod registry;
pub mod segment;
pub mod status;

use serde::Serialize;

pub use attributes::{parse_attributes, AttributeMap};
pub use preprocess::{preprocess, InProgress, Preprocessed};
pub use registry::TagRegistry;
pub use segment::segment;
pub use status::{resolve_status, TagStatus};

// ── Pieces ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPiece {
    Markdown { text: String },
    Tag(TagPiece),
}

/// One tag occurrence. `in_progress` is set when its closer was synthesized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagPiece {
    pub tag_name: String,
    pub attributes: AttributeMap,
    pub inner_content: String,
    pub start_offset: usize,
    pub in_progress: bool,
}

impl TagPiece {
    /// Attribute value, or an empty string when the model left it out.
    pub fn attr(&self, key: &str) -> &str {
        self.attributes.get(key).map_or("", String::as_str)
    }

    pub fn status(&self, stream_active: bool) -> TagStatus {
        resolve_status(self.in_progress, stream_active)
    }
}

impl ContentPiece {
    pub fn as_tag(&self) -> Option<&TagPiece> {
        match self {
            ContentPiece::Tag(tag) => Some(tag),
            ContentPiece::Markdown { .. } => None,
        }
    }

    /// Resolved status for tags; markdown has none.
    pub fn status(&self, stream_active: bool) -> Option<TagStatus> {
        self.as_tag().map(|tag| tag.status(stream_active))
    }
}

// ── Entry points ──────────────────────────────────────────────────────────────

/// Parse a response against the built-in tag vocabulary.
pub fn parse(text: &str) -> Vec<ContentPiece> {
    parse_with(TagRegistry::builtin(), text)
}

pub fn parse_with(registry: &TagRegistry, text: &str) -> Vec<ContentPiece> {
    let Preprocessed { processed_text, in_progress } = preprocess(text, registry);
    segment(&processed_text, registry, &in_progress)
}

/// All occurrences of `tag_name`, in document order.
pub fn tags_named<'a>(
    pieces: &'a [ContentPiece],
    tag_name: &'a str,
) -> impl Iterator<Item = &'a TagPiece> + 'a {
    pieces
        .iter()
        .filter_map(ContentPiece::as_tag)
        .filter(move |tag| tag.tag_name == tag_name)
}
