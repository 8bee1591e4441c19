//! Selection pipeline benchmarks.
//!
//! Run with: `cargo bench -p faqsift-core --bench pipeline`
//!
//! - **similarity**: per-parent similarity matrix construction
//! - **kmeans**: one k-means fit with restarts
//! - **select_k**: full candidate evaluation for one parent
//! - **pipeline**: end-to-end runs over growing datasets

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use faqsift_core::clustering::{kmeans, select_k, KMeansParams};
use faqsift_core::config::SelectionConfig;
use faqsift_core::embedding::EmbeddingRecord;
use faqsift_core::processing::SelectionPipeline;
use faqsift_core::similarity::SimilarityMatrix;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

// =============================================================================
// Configuration
// =============================================================================

/// Embedding dimension used for synthetic data.
const DIM: usize = 384;

/// Members per parent cluster.
const PARENT_SIZES: &[usize] = &[50, 100, 200];

/// Parent clusters per end-to-end run.
const PARENT_COUNTS: &[usize] = &[10, 50];

// =============================================================================
// Test Data Generation
// =============================================================================

fn seeded_value(seed: u64, i: usize) -> f32 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    i.hash(&mut hasher);
    let h = hasher.finish();
    ((h as f32 / u64::MAX as f32) * 2.0) - 1.0
}

/// Unit vector near one of four topic directions.
fn seeded_embedding(seed: u64) -> Vec<f32> {
    let topic = (seed % 4) as usize;
    let raw: Vec<f32> = (0..DIM)
        .map(|i| {
            let base = if i % 4 == topic { 1.0 } else { 0.0 };
            base + 0.3 * seeded_value(seed, i)
        })
        .collect();
    let norm: f32 = raw.iter().map(|x| x * x).sum::<f32>().sqrt();
    raw.into_iter().map(|x| x / norm).collect()
}

fn parent_vectors(size: usize, parent: u64) -> Vec<Vec<f32>> {
    (0..size as u64)
        .map(|i| seeded_embedding(parent * 100_000 + i))
        .collect()
}

fn dataset(parents: usize, members: usize) -> Vec<EmbeddingRecord> {
    (0..parents as u64)
        .flat_map(|p| {
            parent_vectors(members, p)
                .into_iter()
                .enumerate()
                .map(move |(i, v)| EmbeddingRecord::new(format!("{}-{}", p, i), format!("p{}", p), v))
        })
        .collect()
}

// =============================================================================
// Component Benchmarks
// =============================================================================

fn bench_similarity_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity/matrix");
    group.sample_size(20);

    for &size in PARENT_SIZES {
        let vectors = parent_vectors(size, 1);
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &vectors, |b, v| {
            b.iter(|| SimilarityMatrix::compute(black_box(v)));
        });
    }

    group.finish();
}

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("clustering/kmeans");
    group.sample_size(20);

    for &size in PARENT_SIZES {
        let vectors = parent_vectors(size, 2);
        let params = KMeansParams {
            k: 4,
            n_init: 10,
            max_iter: 300,
            seed: 42,
        };
        group.bench_with_input(BenchmarkId::from_parameter(size), &vectors, |b, v| {
            b.iter(|| kmeans(black_box(v), &params));
        });
    }

    group.finish();
}

fn bench_select_k(c: &mut Criterion) {
    let mut group = c.benchmark_group("clustering/select_k");
    group.sample_size(10);
    let config = SelectionConfig::default();

    for &size in PARENT_SIZES {
        let vectors = parent_vectors(size, 3);
        let matrix = SimilarityMatrix::compute(&vectors);
        group.bench_with_input(BenchmarkId::from_parameter(size), &vectors, |b, v| {
            b.iter(|| select_k("bench", black_box(v), &matrix, &config));
        });
    }

    group.finish();
}

// =============================================================================
// End-to-End Benchmarks
// =============================================================================

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline/run");
    group.sample_size(10);

    let pipeline =
        SelectionPipeline::new(SelectionConfig::default()).expect("default config is valid");

    for &parents in PARENT_COUNTS {
        let records = dataset(parents, 80);
        group.throughput(Throughput::Elements(records.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(parents), &records, |b, r| {
            b.iter(|| pipeline.run(black_box(r.clone())));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_similarity_matrix,
    bench_kmeans,
    bench_select_k,
    bench_pipeline
);
criterion_main!(benches);
