use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::types::DocId;

/// A scored document, ordered by descending `score` then ascending
/// `doc_id` on ties.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub doc_id: DocId,
    pub score: f64,
}

impl Eq for ScoredDocument {}

impl Ord for ScoredDocument {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .partial_cmp(&other.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.doc_id.cmp(&self.doc_id))
    }
}

impl PartialOrd for ScoredDocument {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Size-bounded min-heap: keeps the `k` highest-scoring documents seen,
/// evicting the current minimum whenever a larger score arrives.
///
/// Wraps each entry in `std::cmp::Reverse` so `BinaryHeap::peek`/`pop`
/// expose the *minimum* scored document.
pub struct TopKCollector {
    heap: BinaryHeap<std::cmp::Reverse<ScoredDocument>>,
    k: usize,
}

impl TopKCollector {
    pub fn new(k: usize) -> Self {
        TopKCollector { heap: BinaryHeap::with_capacity(k + 1), k }
    }

    pub fn offer(&mut self, doc: ScoredDocument) {
        if self.k == 0 {
            return;
        }
        if self.heap.len() < self.k {
            self.heap.push(std::cmp::Reverse(doc));
            return;
        }
        let should_replace = self.heap.peek().is_some_and(|std::cmp::Reverse(min)| doc > *min);
        if should_replace {
            self.heap.pop();
            self.heap.push(std::cmp::Reverse(doc));
        }
    }

    /// Final results sorted by descending score, ascending `doc_id` on ties.
    pub fn into_sorted_vec(self) -> Vec<ScoredDocument> {
        let mut results: Vec<ScoredDocument> = self.heap.into_iter().map(|r| r.0).collect();
        results.sort_by(|a, b| b.cmp(a));
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(id: &str, score: f64) -> ScoredDocument {
        ScoredDocument { doc_id: DocId::new(id), score }
    }

    #[test]
    fn keeps_only_the_k_highest_scores() {
        let mut collector = TopKCollector::new(2);
        for (id, score) in [("d1", 1.0), ("d2", 3.0), ("d3", 2.0), ("d4", 0.5)] {
            collector.offer(scored(id, score));
        }
        let results = collector.into_sorted_vec();
        let ids: Vec<&str> = results.iter().map(|d| d.doc_id.as_str()).collect();
        assert_eq!(ids, vec!["d2", "d3"]);
    }

    #[test]
    fn ties_break_by_ascending_doc_id() {
        let mut collector = TopKCollector::new(2);
        collector.offer(scored("d2", 1.0));
        collector.offer(scored("d1", 1.0));
        let results = collector.into_sorted_vec();
        assert_eq!(results[0].doc_id.as_str(), "d1");
        assert_eq!(results[1].doc_id.as_str(), "d2");
    }
}
