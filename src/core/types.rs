use serde::{Deserialize, Serialize};

/// A document's stable identifier. The corpus's native string id, not a
/// numeric surrogate — the on-disk artifacts are keyed by this string,
/// and the merger's "doc_ids partitioned across partials, fed in
/// ascending order" precondition is about loader enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocId(pub String);

impl DocId {
    pub fn new(id: impl Into<String>) -> Self {
        DocId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DocId {
    fn from(id: String) -> Self {
        DocId(id)
    }
}

impl std::fmt::Display for DocId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A document as yielded by a `DocumentSource`, before tokenization.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub doc_id: DocId,
    pub url: String,
    pub html_bytes: Vec<u8>,
}

/// `{doc_id, tf}` — the compact posting schema. The URL lives only in
/// the id→url map, never duplicated onto the posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub tf: u32,
}

impl Posting {
    pub fn new(doc_id: DocId, tf: u32) -> Self {
        Posting { doc_id, tf }
    }
}

/// Strip any URL fragment (`#...`), per the document source contract.
pub fn normalize_url(url: &str) -> String {
    match url.find('#') {
        Some(idx) => url[..idx].to_string(),
        None => url.to_string(),
    }
}
