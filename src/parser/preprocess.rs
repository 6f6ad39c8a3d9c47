use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use tracing::{debug, trace};

use super::registry::TagRegistry;

// ── In-progress bookkeeping ───────────────────────────────────────────────────

/// Start offsets of the trailing openers left unclosed, keyed by tag name, and
/// where the appended closers begin. Lives for a single parse call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InProgress {
    offsets: HashMap<String, BTreeSet<usize>>,
    /// Where the synthesized closers begin, if any were added.
    synthesized_from: Option<usize>,
}

impl InProgress {
    pub fn contains(&self, tag_name: &str, offset: usize) -> bool {
        self.offsets
            .get(tag_name)
            .is_some_and(|set| set.contains(&offset))
    }

    pub fn offsets(&self, tag_name: &str) -> impl Iterator<Item = usize> + '_ {
        self.offsets.get(tag_name).into_iter().flatten().copied()
    }

    /// Whether a closer at `offset` was appended rather than written by the model.
    pub fn is_synthesized(&self, offset: usize) -> bool {
        self.synthesized_from.is_some_and(|from| offset >= from)
    }

    /// Length of the text as written, before any closers were appended.
    pub fn written_len(&self, processed_len: usize) -> usize {
        self.synthesized_from.unwrap_or(processed_len)
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.values().all(BTreeSet::is_empty)
    }

    fn mark(&mut self, tag_name: &str, offset: usize) {
        self.offsets
            .entry(tag_name.to_string())
            .or_default()
            .insert(offset);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preprocessed {
    pub processed_text: String,
    pub in_progress: InProgress,
}

// ── Unclosed-tag closing ──────────────────────────────────────────────────────

/// Close every registered tag left open at the end of `text`.
///
/// For each name with more openers than closers, the trailing surplus of
/// openers is treated as still being written: their offsets are recorded and a
/// matching `</name>` is appended per opener. Closers are appended innermost
/// first so that an unfinished tag nested in another unfinished tag stays inside it.
pub fn preprocess(text: &str, registry: &TagRegistry) -> Preprocessed {
    let mut in_progress = InProgress::default();
    let Some(patterns) = registry.patterns() else {
        return Preprocessed { processed_text: text.to_string(), in_progress };
    };

    let mut opens: IndexMap<&str, Vec<usize>> = IndexMap::new();
    for caps in patterns.open.captures_iter(text) {
        if let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) {
            opens.entry(name.as_str()).or_default().push(whole.start());
        }
    }

    let mut closes: HashMap<&str, usize> = HashMap::new();
    for caps in patterns.close.captures_iter(text) {
        if let Some(name) = caps.get(1) {
            *closes.entry(name.as_str()).or_default() += 1;
        }
    }

    let mut unclosed: Vec<(usize, &str)> = Vec::new();
    for (&name, starts) in &opens {
        let closed = closes.get(name).copied().unwrap_or(0);
        let surplus = starts.len().saturating_sub(closed);
        if surplus == 0 {
            continue;
        }
        trace!(tag = name, opens = starts.len(), closes = closed, "unbalanced tag");
        for &start in &starts[starts.len() - surplus..] {
            in_progress.mark(name, start);
            unclosed.push((start, name));
        }
    }

    if unclosed.is_empty() {
        return Preprocessed { processed_text: text.to_string(), in_progress };
    }

    in_progress.synthesized_from = Some(text.len());
    unclosed.sort_unstable_by(|a, b| b.0.cmp(&a.0));
    let mut processed_text = String::with_capacity(text.len() + unclosed.len() * 24);
    processed_text.push_str(text);
    for (_, name) in &unclosed {
        processed_text.push_str("</");
        processed_text.push_str(name);
        processed_text.push('>');
    }
    debug!(synthesized = unclosed.len(), "closed unfinished tags");

    Preprocessed { processed_text, in_progress }
}
