use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

/// Attribute key/value pairs in the order their keys first appeared.
pub type AttributeMap = IndexMap<String, String>;

static ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:^|\s)([\w-]+)="([^"]*)""#).expect("attribute pattern"));

/// Parse `key="value"` pairs out of the text between a tag name and its `>`.
///
/// Pairs must be separated by whitespace. Only double-quoted values are
/// recognised and there is no escaping. Anything else in `raw` is skipped.
/// A repeated key keeps its last value.
pub fn parse_attributes(raw: &str) -> AttributeMap {
    let mut attributes = AttributeMap::new();
    for caps in ATTRIBUTE.captures_iter(raw) {
        attributes.insert(caps[1].to_string(), caps[2].to_string());
    }
    attributes
}
