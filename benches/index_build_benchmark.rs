use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use static_search::core::config::Config;
use static_search::core::error::Result;
use static_search::core::types::{DocId, RawDocument};
use static_search::doc::loader::DocumentSource;
use static_search::IndexBuilder;

struct GeneratedSource(Vec<RawDocument>);

impl DocumentSource for GeneratedSource {
    fn documents(&self) -> Result<Vec<RawDocument>> {
        Ok(self.0.clone())
    }
}

fn generate_corpus(doc_count: usize) -> GeneratedSource {
    let docs = (0..doc_count)
        .map(|i| RawDocument {
            doc_id: DocId::new(format!("d{i}")),
            url: format!("https://example.test/{i}"),
            html_bytes: format!(
                "<html><body><p>Document {i} discusses rust programming, search engines, \
                 inverted indexes, and term frequency scoring in moderate detail.</p></body></html>"
            )
            .into_bytes(),
        })
        .collect();
    GeneratedSource(docs)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for doc_count in [100usize, 1_000] {
        let source = generate_corpus(doc_count);
        group.bench_with_input(BenchmarkId::new("build", doc_count), &source, |b, source| {
            b.iter(|| {
                let dir = tempfile::tempdir().unwrap();
                let config = Config {
                    corpus_dir: dir.path().to_path_buf(),
                    index_dir: dir.path().join("index"),
                    chunk_size: 200,
                    top_k: 10,
                };
                let report = IndexBuilder::new().build(source, &config).unwrap();
                black_box(report);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
