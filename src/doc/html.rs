use regex::Regex;
use std::sync::LazyLock;

/// Accepts HTML bytes and returns plain text: inline content joined by
/// a single space, ends trimmed.
pub trait HtmlExtractor: Send + Sync {
    fn extract(&self, html: &[u8]) -> String;
}

static SCRIPT_OR_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</\1>").unwrap());
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// A small tag-stripping extractor. Not a structural HTML5 parser — only
/// whitespace-joined inline text is required, not correctness of
/// document structure, so a regex pass over tags is sufficient.
pub struct PlainTextExtractor;

impl HtmlExtractor for PlainTextExtractor {
    fn extract(&self, html: &[u8]) -> String {
        let raw = String::from_utf8_lossy(html);
        let without_scripts = SCRIPT_OR_STYLE.replace_all(&raw, " ");
        let without_tags = TAG.replace_all(&without_scripts, " ");
        let decoded = decode_entities(&without_tags);
        WHITESPACE.replace_all(decoded.trim(), " ").to_string()
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
}
