use std::time::Duration;

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use merkletree::prelude::*;
use rand::RngCore;
use rand::thread_rng;

fn random_blocks(count: usize) -> Vec<Vec<u8>> {
    let mut rng = thread_rng();
    (0..count)
        .map(|_| {
            let mut data = vec![0_u8; 100];
            rng.fill_bytes(&mut data);
            data
        })
        .collect()
}

fn merkle_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("merkle_tree");

    let size = 10_000;
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(20));

    let blocks = random_blocks(size);

    group.bench_function(BenchmarkId::new("build_serial", size), |bencher| {
        bencher.iter(|| MerkleTree::new(Config::new(), &blocks).unwrap());
    });

    group.bench_function(BenchmarkId::new("build_parallel", size), |bencher| {
        let config = Config {
            run_in_parallel: true,
            ..Config::new()
        };
        bencher.iter(|| MerkleTree::new(config.clone(), &blocks).unwrap());
    });

    group.bench_function(BenchmarkId::new("build_tree_only", size), |bencher| {
        let config = Config {
            mode: Mode::TreeBuild,
            ..Config::new()
        };
        bencher.iter(|| MerkleTree::new(config.clone(), &blocks).unwrap());
    });

    group.finish();
}

criterion_group!(benches, merkle_tree);
criterion_main!(benches);
