//! Normalization of loosely-typed MCP tool results.
//!
//! Tool output reaches the client in whatever shape the server chose: plain
//! text, JSON objects, arrays of search hits, or JSON that was serialized
//! again at every hop.  [`normalize`] turns any of these into a
//! [`NormalizedResult`] with a decoded value, a text rendering, and the links
//! worth showing.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// How many layers of JSON-in-a-string are unwrapped by default.
pub const DEFAULT_MAX_DECODE_DEPTH: usize = 4;

/// Object keys that usually hold a list of hits, in priority order.
const LINK_COLLECTION_KEYS: &[&str] = &[
    "results",
    "items",
    "data",
    "links",
    "web_pages",
    "search_result",
];

const URL_KEYS: &[&str] = &["url", "link", "href"];
const LINK_TITLE_KEYS: &[&str] = &["title", "name", "site"];
const SNIPPET_KEYS: &[&str] = &["snippet", "summary", "description", "content"];
const ICON_KEYS: &[&str] = &["icon", "favicon"];

const TITLE_KEYS: &[&str] = &["title", "name"];
const DESCRIPTION_KEYS: &[&str] = &["description", "summary"];

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s)\]"'>]+"#).expect("url pattern compiles"));

// ── Types ────────────────────────────────────────────────────────────────────

/// A link pulled out of a tool result for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkItem {
    pub title: String,
    /// Always non-empty and trimmed.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl LinkItem {
    fn bare(url: &str) -> Self {
        Self {
            title: url.to_string(),
            url: url.to_string(),
            snippet: None,
            icon: None,
        }
    }
}

/// Display-ready view of a tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResult {
    /// The result after unwrapping JSON-encoded strings.
    pub parsed: Value,
    /// Human-readable rendering of `parsed`.
    pub text: String,
    /// Links found in the result, unique by URL, in first-seen order.
    pub links: Vec<LinkItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

// ── Normalizer ───────────────────────────────────────────────────────────────

/// Result normalizer with a configurable decode depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultNormalizer {
    max_decode_depth: usize,
}

impl Default for ResultNormalizer {
    fn default() -> Self {
        Self {
            max_decode_depth: DEFAULT_MAX_DECODE_DEPTH,
        }
    }
}

impl ResultNormalizer {
    pub fn new(max_decode_depth: usize) -> Self {
        Self { max_decode_depth }
    }

    pub fn max_decode_depth(&self) -> usize {
        self.max_decode_depth
    }

    /// Normalize a raw tool result.  Total: any input produces a result.
    pub fn normalize(&self, raw: &Value) -> NormalizedResult {
        let parsed = self.deep_decode(raw);
        let text = render_text(&parsed);
        let links = extract_links(&parsed, &text);

        let (title, description, content) = match &parsed {
            Value::Object(map) => (
                first_present(map, TITLE_KEYS).map(render_text),
                first_present(map, DESCRIPTION_KEYS).map(render_text),
                map.get("content").filter(|v| !v.is_null()).cloned(),
            ),
            _ => (None, None, None),
        };

        NormalizedResult {
            parsed,
            text,
            links,
            title,
            description,
            content,
        }
    }

    /// Unwrap strings that contain JSON, up to `max_decode_depth` layers.
    ///
    /// Stops at the first string that is blank or does not parse, keeping
    /// that string as-is.
    fn deep_decode(&self, raw: &Value) -> Value {
        let mut current = raw.clone();
        let mut layers = 0;
        while layers < self.max_decode_depth {
            let Value::String(s) = &current else { break };
            let trimmed = s.trim();
            if trimmed.is_empty() {
                break;
            }
            match serde_json::from_str::<Value>(trimmed) {
                Ok(next) if next != current => current = next,
                _ => break,
            }
            layers += 1;
        }
        if layers == self.max_decode_depth && current.is_string() {
            debug!(layers, "result still a string at decode depth cap");
        }
        current
    }
}

/// Normalize with the default decode depth.
pub fn normalize(raw: &Value) -> NormalizedResult {
    ResultNormalizer::default().normalize(raw)
}

/// Render a value as display text.
///
/// Strings pass through, null is empty, scalars use their canonical form and
/// containers are pretty-printed JSON.
pub fn render_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

// ── Link extraction ──────────────────────────────────────────────────────────

fn extract_links(parsed: &Value, text: &str) -> Vec<LinkItem> {
    let links = match parsed {
        Value::Array(items) => links_from_array(items),
        Value::Object(map) => links_from_object(map),
        _ => Vec::new(),
    };
    if !links.is_empty() || text.is_empty() {
        return links;
    }
    let scanned = links_from_text(text);
    if !scanned.is_empty() {
        debug!(count = scanned.len(), "links recovered from result text");
    }
    scanned
}

fn links_from_array(items: &[Value]) -> Vec<LinkItem> {
    dedup_by_url(items.iter().filter_map(pick_link))
}

fn links_from_object(map: &Map<String, Value>) -> Vec<LinkItem> {
    for key in LINK_COLLECTION_KEYS {
        if let Some(Value::Array(items)) = map.get(*key) {
            let links = links_from_array(items);
            if !links.is_empty() {
                return links;
            }
        }
    }
    link_from_map(map).into_iter().collect()
}

fn links_from_text(text: &str) -> Vec<LinkItem> {
    dedup_by_url(URL_RE.find_iter(text).map(|m| LinkItem::bare(m.as_str())))
}

fn pick_link(item: &Value) -> Option<LinkItem> {
    item.as_object().and_then(link_from_map)
}

fn link_from_map(map: &Map<String, Value>) -> Option<LinkItem> {
    // Only the first present field is considered; a blank one rejects the item.
    let url = first_present(map, URL_KEYS)
        .and_then(scalar_text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())?;

    let title = first_present(map, LINK_TITLE_KEYS)
        .map(render_text)
        .unwrap_or_else(|| url.clone());

    Some(LinkItem {
        title,
        snippet: first_present(map, SNIPPET_KEYS).map(render_text),
        icon: first_present(map, ICON_KEYS).map(render_text),
        url,
    })
}

fn dedup_by_url(links: impl Iterator<Item = LinkItem>) -> Vec<LinkItem> {
    let mut seen = HashSet::new();
    links.filter(|link| seen.insert(link.url.clone())).collect()
}

// ── Field lookup ─────────────────────────────────────────────────────────────

/// First value among `keys` that carries something: not null, not `false`,
/// not zero, not an empty string.
fn first_present<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|k| map.get(*k)).find(|v| is_present(v))
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => true,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn urls(result: &NormalizedResult) -> Vec<&str> {
        result.links.iter().map(|l| l.url.as_str()).collect()
    }

    // ── Decoding ───────────────────────────────────────────────────────────

    #[test]
    fn double_encoded_object_is_unwrapped() {
        let raw = Value::String(r#""{\"title\":\"x\"}""#.to_string());
        let out = normalize(&raw);
        assert_eq!(out.parsed, json!({"title": "x"}));
        assert_eq!(out.title.as_deref(), Some("x"));
    }

    #[test]
    fn plain_text_is_kept_verbatim() {
        let raw = json!("  just some output\n");
        let out = normalize(&raw);
        assert_eq!(out.parsed, raw);
        assert_eq!(out.text, "  just some output\n");
        assert!(out.links.is_empty());
    }

    #[test]
    fn decode_stops_at_depth_cap() {
        let mut encoded = json!({"a": 1});
        let mut layers = vec![encoded.clone()];
        for _ in 0..10 {
            encoded = Value::String(serde_json::to_string(&encoded).unwrap());
            layers.push(encoded.clone());
        }
        let out = normalize(&encoded);
        // Ten layers in, four peeled off.
        assert_eq!(out.parsed, layers[6]);
        assert!(out.parsed.is_string());
    }

    #[test]
    fn custom_depth_is_honoured() {
        let raw = Value::String(r#""{\"k\":1}""#.to_string());
        let shallow = ResultNormalizer::new(1).normalize(&raw);
        assert_eq!(shallow.parsed, json!(r#"{"k":1}"#));
        let none = ResultNormalizer::new(0).normalize(&raw);
        assert_eq!(none.parsed, raw);
    }

    #[test]
    fn decoding_reaches_a_fixed_point() {
        let inputs = [
            json!({"results": [{"url": "https://a.dev"}], "n": 2}),
            json!("not json at all"),
            json!([1, "two", {"three": null}]),
            Value::String("\"{\\\"nested\\\":[true]}\"".to_string()),
            json!(42),
        ];
        for input in inputs {
            let first = normalize(&input);
            let rewrapped = Value::String(serde_json::to_string(&first.parsed).unwrap());
            let second = normalize(&rewrapped);
            assert_eq!(second.parsed, first.parsed, "input: {input}");
        }
    }

    #[test]
    fn json_scalars_inside_strings_are_decoded() {
        assert_eq!(normalize(&json!("123")).parsed, json!(123));
        assert_eq!(normalize(&json!("true")).text, "true");
    }

    #[test]
    fn blank_and_null_inputs() {
        let out = normalize(&Value::Null);
        assert_eq!(out.text, "");
        assert!(out.links.is_empty());
        assert!(out.title.is_none());

        let out = normalize(&json!("   "));
        assert_eq!(out.text, "   ");
        assert!(out.links.is_empty());
    }

    #[test]
    fn malformed_json_never_panics() {
        for raw in ["{", "[1, 2", "\"unterminated", "{\"a\":}", "]]]", "nul"] {
            let out = normalize(&json!(raw));
            assert_eq!(out.text, raw);
        }
        let deep = format!("{}{}", "[".repeat(500), "]".repeat(500));
        let out = normalize(&json!(deep));
        assert!(!out.text.is_empty());
    }

    // ── Text rendering ─────────────────────────────────────────────────────

    #[test]
    fn containers_render_as_pretty_json() {
        let out = normalize(&json!({"a": [1, 2]}));
        assert_eq!(out.text, "{\n  \"a\": [\n    1,\n    2\n  ]\n}");
    }

    #[test]
    fn scalars_render_canonically() {
        assert_eq!(render_text(&json!(false)), "false");
        assert_eq!(render_text(&json!(7)), "7");
        assert_eq!(render_text(&json!(null)), "");
    }

    // ── Links ──────────────────────────────────────────────────────────────

    #[test]
    fn array_hits_are_deduplicated_in_order() {
        let raw = json!([
            {"url": "https://a.dev", "title": "A"},
            {"url": "https://b.dev", "title": "B"},
            {"url": "https://a.dev", "title": "A again"},
            {"href": "https://c.dev"},
        ]);
        let out = normalize(&raw);
        assert_eq!(urls(&out), ["https://a.dev", "https://b.dev", "https://c.dev"]);
        assert_eq!(out.links[0].title, "A");
        assert_eq!(out.links[2].title, "https://c.dev");
    }

    #[test]
    fn link_fields_use_aliases() {
        let raw = json!([{
            "link": "  https://example.com/page  ",
            "site": "Example",
            "summary": "A page",
            "favicon": "https://example.com/favicon.ico",
        }]);
        let out = normalize(&raw);
        assert_eq!(
            out.links,
            vec![LinkItem {
                title: "Example".into(),
                url: "https://example.com/page".into(),
                snippet: Some("A page".into()),
                icon: Some("https://example.com/favicon.ico".into()),
            }]
        );
    }

    #[test]
    fn blank_url_rejects_the_item() {
        let raw = json!([{"url": "   ", "link": "https://fallback.dev", "title": "T"}]);
        let out = normalize(&raw);
        // Only the text scan sees the link, so the title is the URL.
        assert_eq!(urls(&out), ["https://fallback.dev"]);
        assert_eq!(out.links[0].title, "https://fallback.dev");
    }

    #[test]
    fn zero_url_is_skipped_for_next_alias() {
        let raw = json!([{"url": 0, "link": "https://fallback.dev", "title": "T"}]);
        let out = normalize(&raw);
        assert_eq!(urls(&out), ["https://fallback.dev"]);
        assert_eq!(out.links[0].title, "T");
    }

    #[test]
    fn zero_fields_count_as_absent() {
        let out = normalize(&json!({"title": 0, "name": "N"}));
        assert_eq!(out.title.as_deref(), Some("N"));

        let raw = json!([{"url": "https://z.dev", "title": 0, "site": "Site", "snippet": 0, "icon": 0}]);
        let out = normalize(&raw);
        assert_eq!(out.links[0].title, "Site");
        assert!(out.links[0].snippet.is_none());
        assert!(out.links[0].icon.is_none());

        let out = normalize(&json!({"title": 7}));
        assert_eq!(out.title.as_deref(), Some("7"));
    }

    #[test]
    fn collection_keys_are_tried_in_order() {
        let raw = json!({
            "items": [{"url": "https://items.dev"}],
            "results": [{"url": "https://results.dev"}],
        });
        assert_eq!(urls(&normalize(&raw)), ["https://results.dev"]);

        let raw = json!({
            "results": [{"no_url": true}],
            "web_pages": [{"url": "https://pages.dev"}],
        });
        assert_eq!(urls(&normalize(&raw)), ["https://pages.dev"]);
    }

    #[test]
    fn object_itself_can_be_a_link() {
        let raw = json!({"url": "https://solo.dev", "title": "Solo", "content": "body"});
        let out = normalize(&raw);
        assert_eq!(out.links.len(), 1);
        assert_eq!(out.links[0].title, "Solo");
        assert_eq!(out.links[0].snippet.as_deref(), Some("body"));
    }

    #[test]
    fn structured_links_suppress_text_scan() {
        let raw = json!({
            "results": [{"url": "http://a"}],
            "note": "see also https://other.dev",
        });
        let out = normalize(&raw);
        assert_eq!(urls(&out), ["http://a"]);
    }

    #[test]
    fn empty_collection_falls_back_to_text_scan() {
        let raw = json!({
            "results": [],
            "description": "Nothing structured, but try https://docs.rs/regex for details",
        });
        let out = normalize(&raw);
        assert_eq!(urls(&out), ["https://docs.rs/regex"]);
        assert_eq!(out.links[0].title, "https://docs.rs/regex");
    }

    #[test]
    fn text_scan_dedups_and_stops_at_delimiters() {
        let raw = json!(
            "Sources: (https://a.dev/x) and 'https://b.org/y' plus <https://c.io> \
             and again https://a.dev/x"
        );
        let out = normalize(&raw);
        assert_eq!(urls(&out), ["https://a.dev/x", "https://b.org/y", "https://c.io"]);
    }

    #[test]
    fn array_of_plain_strings_uses_text_scan() {
        let out = normalize(&json!(["https://one.dev", "https://two.dev"]));
        assert_eq!(urls(&out), ["https://one.dev", "https://two.dev"]);
    }

    #[test]
    fn encoded_search_payload() {
        let payload = json!({
            "search_result": [
                {"title": "Rust", "link": "https://rust-lang.org", "content": "A language"},
                {"title": "Crates", "link": "https://crates.io"},
            ]
        });
        let raw = Value::String(payload.to_string());
        let out = normalize(&raw);
        assert_eq!(out.parsed, payload);
        assert_eq!(urls(&out), ["https://rust-lang.org", "https://crates.io"]);
        assert_eq!(out.links[0].snippet.as_deref(), Some("A language"));
        assert!(out.links[1].snippet.is_none());
    }

    // ── Metadata ───────────────────────────────────────────────────────────

    #[test]
    fn metadata_is_taken_from_objects() {
        let raw = json!({
            "name": "Page",
            "summary": "Short",
            "content": {"blocks": 3},
        });
        let out = normalize(&raw);
        assert_eq!(out.title.as_deref(), Some("Page"));
        assert_eq!(out.description.as_deref(), Some("Short"));
        assert_eq!(out.content, Some(json!({"blocks": 3})));
    }

    #[test]
    fn empty_title_falls_back_to_name() {
        let out = normalize(&json!({"title": "", "name": "Named", "content": null}));
        assert_eq!(out.title.as_deref(), Some("Named"));
        assert!(out.content.is_none());
    }

    #[test]
    fn metadata_absent_for_non_objects() {
        let out = normalize(&json!([{"title": "x"}]));
        assert!(out.title.is_none());
        assert!(out.description.is_none());
        assert!(out.content.is_none());
    }

    #[test]
    fn normalized_result_serializes_without_absent_fields() {
        let out = normalize(&json!("plain"));
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json, json!({"parsed": "plain", "text": "plain", "links": []}));
    }
}
