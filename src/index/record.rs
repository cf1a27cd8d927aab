use std::collections::HashMap;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{Serializer, SerializeMap};
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};
use crate::index::posting::Posting;

/// One line of the final index / a partial index: `{"<token>": [postings]}`.
///
/// Framed one-record-per-line so a byte offset from the secondary index
/// addresses an entire posting list with a single seek + read.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRecord {
    pub token: String,
    pub postings: Vec<Posting>,
}

impl IndexRecord {
    pub fn new(token: impl Into<String>, postings: Vec<Posting>) -> Self {
        IndexRecord { token: token.into(), postings }
    }

    pub fn to_line(&self) -> Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    pub fn from_line(line: &str) -> Result<Self> {
        serde_json::from_str(line.trim_end()).map_err(Error::from)
    }
}

impl Serialize for IndexRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.token, &self.postings)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for IndexRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = IndexRecord;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a single-entry object {token: [postings]}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<IndexRecord, A::Error> {
                let (token, postings) = map
                    .next_entry::<String, Vec<Posting>>()?
                    .ok_or_else(|| de::Error::custom("index record has no token entry"))?;
                Ok(IndexRecord { token, postings })
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Coalesce `token -> postings` pairs (used while a partition or a merge
/// run is still open in memory) into sorted `IndexRecord`s.
pub fn into_sorted_records(partition: HashMap<String, Vec<Posting>>) -> Vec<IndexRecord> {
    let mut tokens: Vec<String> = partition.keys().cloned().collect();
    tokens.sort();

    tokens
        .into_iter()
        .map(|token| {
            let mut postings = partition[&token].clone();
            postings.sort_by(|a, b| a.doc_id.cmp(&b.doc_id));
            IndexRecord::new(token, postings)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DocId;

    #[test]
    fn round_trips_through_json() {
        let record = IndexRecord::new(
            "fox",
            vec![Posting::new(DocId::new("d1"), 1), Posting::new(DocId::new("d3"), 1)],
        );
        let line = record.to_line().unwrap();
        assert_eq!(line, "{\"fox\":[{\"doc_id\":\"d1\",\"tf\":1},{\"doc_id\":\"d3\",\"tf\":1}]}\n");

        let parsed = IndexRecord::from_line(&line).unwrap();
        assert_eq!(parsed, record);
    }
}
