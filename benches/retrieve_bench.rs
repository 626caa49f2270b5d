//! Benchmarks for retrieval ranking

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rag_store::{Embedding, HashEmbedder, StoreConfig, VectorStore};
use tempfile::TempDir;

const DIM: usize = 768;

fn random_embedding(dim: usize) -> Vec<f64> {
    (0..dim).map(|_| rand::random::<f64>() - 0.5).collect()
}

/// Write a collection file directly; storing one by one rewrites the file each time.
fn seeded_store(dir: &TempDir, size: usize) -> VectorStore<HashEmbedder> {
    let path = dir.path().join("bench.json");
    let records: Vec<_> = (0..size)
        .map(|i| {
            serde_json::json!({
                "id": i.to_string(),
                "text": format!("document {i}"),
                "metadata": {},
                "embedding": random_embedding(DIM),
            })
        })
        .collect();
    std::fs::write(&path, serde_json::to_vec(&records).unwrap()).unwrap();
    VectorStore::open(StoreConfig::new(path), HashEmbedder::new(DIM))
}

fn benchmark_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_by_embedding");

    for size in [100, 1000, 10000].iter() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir, *size);
        let query = Embedding::new(random_embedding(DIM));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| store.search_by_embedding(black_box(&query), black_box(3)).unwrap());
        });
    }

    group.finish();
}

fn benchmark_retrieve(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir, 1000);

    c.bench_function("retrieve_hash_embedder_1000", |b| {
        b.iter(|| store.retrieve(black_box("when does the user like to code"), 3).unwrap());
    });
}

criterion_group!(benches, benchmark_search, benchmark_retrieve);
criterion_main!(benches);
