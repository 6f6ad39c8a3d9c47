use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;

// ── Built-in vocabulary ───────────────────────────────────────────────────────

/// Tag names the model is prompted to emit. The list is kept as it appears in
/// the prompt tables, repeated entries included; `TagRegistry` collapses them.
const TAG_SOURCE: &[&str] = &[
    "think",
    "codiner-write",
    "codiner-rename",
    "codiner-delete",
    "codiner-add-dependency",
    "codiner-execute-sql",
    "codiner-add-integration",
    "codiner-output",
    "codiner-problem-report",
    "codiner-chat-summary",
    "codiner-edit",
    "codiner-search-replace",
    "codiner-codebase-context",
    "codiner-web-search-result",
    "codiner-web-search",
    "codiner-web-crawl",
    "codiner-code-search-result",
    "codiner-code-search",
    "codiner-read",
    "codiner-command",
    "codiner-list-files",
    "codiner-grep",
    "codiner-database-schema",
    "codiner-mcp-tool-call",
    "codiner-status",
    "codiner-write",
];

static BUILTIN: Lazy<TagRegistry> = Lazy::new(|| {
    TagRegistry::new(TAG_SOURCE.iter().copied())
        .expect("built-in tag names form a valid pattern")
});

// ── TagRegistry ───────────────────────────────────────────────────────────────

/// Ordered, deduplicated set of recognised tag names together with the
/// patterns that find their opening and closing delimiters.
#[derive(Debug, Clone)]
pub struct TagRegistry {
    names: IndexSet<String>,
    patterns: Option<TagPatterns>,
}

#[derive(Debug, Clone)]
pub(crate) struct TagPatterns {
    /// `<name ...>`; group 1 is the name, group 2 the raw attribute text.
    pub open: Regex,
    /// `</name>`; group 1 is the name.
    pub close: Regex,
}

impl TagRegistry {
    /// Build a registry from arbitrary names. Repeats and empty names are dropped.
    pub fn new<I, S>(names: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: IndexSet<String> = names
            .into_iter()
            .map(Into::into)
            .filter(|n| !n.is_empty())
            .collect();

        let patterns = if names.is_empty() {
            None
        } else {
            let alternation = names
                .iter()
                .map(|n| regex::escape(n))
                .collect::<Vec<_>>()
                .join("|");
            // A name must end at whitespace or `>` so prefixes never claim longer names.
            Some(TagPatterns {
                open: Regex::new(&format!(r"<({alternation})(\s[^>]*)?>"))?,
                close: Regex::new(&format!(r"</({alternation})>"))?,
            })
        };

        Ok(Self { names, patterns })
    }

    /// The process-wide registry of built-in tag names.
    pub fn builtin() -> &'static TagRegistry {
        &BUILTIN
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub(crate) fn patterns(&self) -> Option<&TagPatterns> {
        self.patterns.as_ref()
    }
}
