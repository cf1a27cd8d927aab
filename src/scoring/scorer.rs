use crate::core::error::Result;
use crate::core::types::{DocId, Posting};
use crate::index::posting::idf;
use std::collections::HashMap;

/// A query vectorized into per-term weights `q[t] = tf_q(t) * idf(t)`,
/// paired with the term's `idf` for term-at-a-time iteration.
pub struct QueryTerm {
    pub term: String,
    pub weight: f64,
    pub idf: f64,
}

/// Builds the query vector: raw term frequencies over stemmed query
/// tokens, scaled by each term's corpus `idf`. Terms absent from the
/// secondary index contribute nothing and are dropped here, not scored
/// as zero. `doc_freq` returning `Ok(None)` means "term absent"; an
/// `Err` (e.g. a corrupt posting record) is propagated to the caller
/// rather than treated the same as absence.
pub fn vectorize_query(
    tokens: &[String],
    doc_freq: impl Fn(&str) -> Result<Option<usize>>,
    doc_count: usize,
) -> Result<Vec<QueryTerm>> {
    let mut tf: HashMap<&str, u32> = HashMap::new();
    for token in tokens {
        *tf.entry(token.as_str()).or_insert(0) += 1;
    }

    let mut terms: Vec<QueryTerm> = Vec::new();
    for (term, freq) in tf {
        if let Some(df) = doc_freq(term)? {
            let term_idf = idf(doc_count, df);
            terms.push(QueryTerm { term: term.to_string(), weight: freq as f64 * term_idf, idf: term_idf });
        }
    }

    // Rarest first: descending idf order.
    terms.sort_by(|a, b| b.idf.partial_cmp(&a.idf).unwrap_or(std::cmp::Ordering::Equal));
    Ok(terms)
}

/// Accumulates `score[d] += (tf_d * idf(t)) * q[t]` for one term's
/// posting list into the running per-document score map.
pub fn accumulate_term(scores: &mut HashMap<DocId, f64>, postings: &[Posting], term: &QueryTerm) {
    for posting in postings {
        let contribution = (posting.tf as f64 * term.idf) * term.weight;
        *scores.entry(posting.doc_id.clone()).or_insert(0.0) += contribution;
    }
}
