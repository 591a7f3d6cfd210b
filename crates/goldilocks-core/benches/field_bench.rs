#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

//! Benchmarks for field arithmetic and the Rescue permutation.

use criterion::{Criterion, criterion_group, criterion_main};
use goldilocks_core::field::batch_inversion;
use goldilocks_core::{FieldElement, Rescue, RescueParams, RoundConstants};
use std::hint::black_box;

fn field_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("field");
    let a = FieldElement::new(0x1234_5678_9abc_def0);
    let b = FieldElement::new(0x0fed_cba9_8765_4321);

    group.bench_function("mul", |bench| bench.iter(|| black_box(a) * black_box(b)));
    group.bench_function("add", |bench| bench.iter(|| black_box(a) + black_box(b)));
    group.bench_function("inv", |bench| bench.iter(|| black_box(a).inv()));
    group.bench_function("exp_inv_alpha", |bench| {
        bench.iter(|| black_box(a).exp_u64(goldilocks_core::INV_ALPHA));
    });

    let values: Vec<FieldElement> = (1..=256u64).map(FieldElement::new).collect();
    group.bench_function("batch_inversion_256", |bench| {
        bench.iter(|| batch_inversion(black_box(&values)));
    });

    group.finish();
}

fn rescue_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("rescue");
    let params = RescueParams::default();
    let rescue = Rescue::new(params).unwrap();

    group.bench_function("round_constants", |bench| {
        bench.iter(|| RoundConstants::generate(black_box(&params)));
    });

    let mut state: Vec<FieldElement> = (0..12u64).map(FieldElement::new).collect();
    group.bench_function("permute", |bench| {
        bench.iter(|| rescue.permute(black_box(&mut state)));
    });

    for len in [32_usize, 1024] {
        let input = vec![0xa5_u8; len];
        group.bench_function(format!("hash_bytes_{len}"), |bench| {
            bench.iter(|| rescue.hash_bytes(black_box(&input)));
        });
    }

    group.finish();
}

criterion_group!(benches, field_benchmark, rescue_benchmark);
criterion_main!(benches);
