use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hnsw_core::{Graph, HnswConfig, Index, LayerSampler, OwnedVectorStore};

fn make_store(n: usize, dim: usize) -> OwnedVectorStore {
    let mut state = 0x9E3779B97F4A7C15u64;
    let mut next = || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        ((state >> 11) as f64 / (1u64 << 53) as f64) as f32
    };
    let vectors = (0..n).map(|_| (0..dim).map(|_| next()).collect()).collect();
    OwnedVectorStore::new(vectors).unwrap()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("hnsw_build");

    for &n in &[1_000usize, 10_000] {
        let store = make_store(n, 32);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("build", n), &n, |b, _| {
            b.iter(|| {
                let mut sampler = LayerSampler::with_seed(7);
                black_box(Graph::build_with_sampler(&store, HnswConfig::balanced(), &mut sampler).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_knn_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("hnsw_knn_search");

    let store = make_store(10_000, 32);
    let index = Index::create_hnsw_index(&store, HnswConfig::balanced()).unwrap();

    for &k in &[1usize, 10, 50] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("approximate_search", k), &k, |b, &k| {
            let query = store.vector(0).to_vec();
            b.iter(|| black_box(index.approximate_search(&query, k).unwrap()));
        });
    }

    group.finish();
}

fn bench_brute_force_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("brute_force_search");

    for &n in &[1_000usize, 10_000] {
        let store = make_store(n, 32);
        let index = Index::create_index(&store).unwrap();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("scan", n), &n, |b, _| {
            let query = store.vector(0).to_vec();
            b.iter(|| black_box(index.brute_force_search(&query, 10).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_knn_search, bench_brute_force_search);
criterion_main!(benches);
