use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use dagred::algo::tred::{tr_b, tr_o, tr_o_plus};
use dagred::generate::gnm;

fn transitive_reduction(c: &mut Criterion) {
    let sparse = gnm(&mut StdRng::seed_from_u64(2_024), 5_000, 10_000, true).unwrap();
    let dense = gnm(&mut StdRng::seed_from_u64(2_024), 1_000, 40_000, true).unwrap();

    let mut group = c.benchmark_group("transitive_reduction");
    for (label, graph) in [("sparse_5k_10k", &sparse), ("dense_1k_40k", &dense)] {
        group.bench_function(format!("tr_b/{label}"), |b| {
            b.iter_batched(
                || graph.clone(),
                |mut g| tr_b(&mut g).unwrap(),
                BatchSize::LargeInput,
            )
        });
        group.bench_function(format!("tr_o/{label}"), |b| {
            b.iter_batched(
                || graph.clone(),
                |mut g| tr_o(&mut g).unwrap(),
                BatchSize::LargeInput,
            )
        });
        group.bench_function(format!("tr_o_plus/{label}"), |b| {
            b.iter_batched(
                || graph.clone(),
                |mut g| tr_o_plus(&mut g).unwrap(),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, transitive_reduction);
criterion_main!(benches);
