use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};

use crate::core::error::{Error, Result};
use crate::core::types::DocId;
use crate::index::posting::idf;
use crate::index::record::IndexRecord;
use crate::storage::layout::StorageLayout;

/// Output of `finalize`: the two artifacts derived from a single
/// sequential pass over the final index.
pub struct FinalizeOutput {
    pub secondary_index: HashMap<String, u64>,
    pub magnitudes: HashMap<DocId, f64>,
}

/// Reads the merged final index line by line, recording each line's
/// starting byte offset and accumulating per-document TF-IDF magnitude.
///
/// `doc_count` is `N`, the corpus cardinality, used for `idf`.
pub fn finalize(layout: &StorageLayout, doc_count: usize) -> Result<FinalizeOutput> {
    let final_path = layout.final_index_path();
    let file = File::open(&final_path)?;
    let mut reader = BufReader::new(file);

    let mut secondary_index = HashMap::new();
    let mut acc: HashMap<DocId, f64> = HashMap::new();
    let mut offset: u64 = 0;

    loop {
        let mut line = String::new();
        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            break;
        }
        let line_offset = offset;
        offset += bytes_read as u64;

        let record = IndexRecord::from_line(&line).map_err(|err| {
            Error::corrupt(format!("{}@{}: {err}", final_path.display(), line_offset))
        })?;

        secondary_index.insert(record.token.clone(), line_offset);

        let term_idf = idf(doc_count, record.postings.len());
        for posting in &record.postings {
            let weight = posting.tf as f64 * term_idf;
            *acc.entry(posting.doc_id.clone()).or_insert(0.0) += weight * weight;
        }
    }

    let magnitudes = acc.into_iter().map(|(doc_id, sum_sq)| (doc_id, sum_sq.sqrt())).collect();

    write_secondary_index(layout, &secondary_index)?;
    write_magnitudes(layout, &magnitudes)?;

    tracing::info!(
        tokens = secondary_index.len(),
        documents = magnitudes.len(),
        "finalized index: secondary index and magnitude map written"
    );

    Ok(FinalizeOutput { secondary_index, magnitudes })
}

fn write_secondary_index(layout: &StorageLayout, index: &HashMap<String, u64>) -> Result<()> {
    let json = serde_json::to_vec(index)?;
    let mut file = File::create(layout.secondary_index_path())?;
    file.write_all(&json)?;
    Ok(())
}

fn write_magnitudes(layout: &StorageLayout, magnitudes: &HashMap<DocId, f64>) -> Result<()> {
    let by_string: HashMap<&str, f64> =
        magnitudes.iter().map(|(doc_id, norm)| (doc_id.as_str(), *norm)).collect();
    let json = serde_json::to_vec(&by_string)?;
    let mut file = File::create(layout.doc_len_file_path())?;
    file.write_all(&json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Posting;
    use crate::index::record::IndexRecord as Rec;
    use std::fs;
    use std::io::Write as _;

    fn write_final_index(layout: &StorageLayout, records: &[Rec]) {
        let mut file = File::create(layout.final_index_path()).unwrap();
        for record in records {
            file.write_all(record.to_line().unwrap().as_bytes()).unwrap();
        }
    }

    #[test]
    fn records_offsets_that_address_each_line() {
        let dir = tempfile::tempdir().unwrap();
        let layout = StorageLayout::create(dir.path().to_path_buf()).unwrap();

        let records = vec![
            Rec::new("brown", vec![Posting::new(DocId::new("d1"), 1)]),
            Rec::new("fox", vec![Posting::new(DocId::new("d1"), 1), Posting::new(DocId::new("d3"), 1)]),
        ];
        write_final_index(&layout, &records);

        let output = finalize(&layout, 3).unwrap();

        let content = fs::read_to_string(layout.final_index_path()).unwrap();
        for (token, offset) in &output.secondary_index {
            let slice = &content[*offset as usize..];
            let line = slice.lines().next().unwrap();
            let parsed = Rec::from_line(line).unwrap();
            assert_eq!(&parsed.token, token);
        }
    }

    #[test]
    fn magnitude_is_euclidean_norm_of_tf_idf_weights() {
        let dir = tempfile::tempdir().unwrap();
        let layout = StorageLayout::create(dir.path().to_path_buf()).unwrap();

        // 3 docs total; "fox" appears in 2 of them -> idf = ln(3/2).
        let records = vec![Rec::new(
            "fox",
            vec![Posting::new(DocId::new("d1"), 1), Posting::new(DocId::new("d3"), 1)],
        )];
        write_final_index(&layout, &records);

        let output = finalize(&layout, 3).unwrap();
        let expected = (3.0_f64 / 2.0).ln();
        assert!((output.magnitudes[&DocId::new("d1")] - expected).abs() < 1e-9);
        assert!((output.magnitudes[&DocId::new("d3")] - expected).abs() < 1e-9);
    }

    #[test]
    fn corrupt_line_reports_file_and_offset() {
        let dir = tempfile::tempdir().unwrap();
        let layout = StorageLayout::create(dir.path().to_path_buf()).unwrap();
        fs::write(layout.final_index_path(), "not json\n").unwrap();

        let err = finalize(&layout, 1).unwrap_err();
        assert!(err.to_string().contains("@0"));
    }
}
