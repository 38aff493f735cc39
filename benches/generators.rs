// Copyright 2022 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause
//   Modified from:
//     Copyright (c) 2018 Chain, Inc.
//     SPDX-License-Identifier: MIT

#![allow(missing_docs)]

#[macro_use]
extern crate criterion;

use cosign_bulletproofs::{BulletproofGens, PedersenGens};
use criterion::{Criterion, SamplingMode};

// Reduced spectrum of tests for the sake of CI bench tests
static BP_GENS_ARR: [usize; 4] = [3, 5, 6, 7];
// To do a full spectrum of tests, use these constants instead
// static BP_GENS_ARR: [usize; 10] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9];

fn pc_gens(c: &mut Criterion) {
    let mut group = c.benchmark_group("PedersenGens");
    group.sampling_mode(SamplingMode::Flat);
    group.bench_function("PedersenGens::default", |b|
        // Benchmark this code
        b.iter(PedersenGens::default));
    group.finish();
}

fn bp_gens(c: &mut Criterion) {
    let mut group = c.benchmark_group("BulletproofGens");
    group.sampling_mode(SamplingMode::Flat);
    for size in BP_GENS_ARR.map(|i| 1 << i) {
        let label = format!("BulletproofGens::new - size {}", size);
        group.bench_function(&label, |b|
            // Benchmark this code
            b.iter(|| BulletproofGens::new(size)));
    }
    group.finish();
}

criterion_group! {
    name = pc_generators;
    config = Criterion::default();
    targets =
    pc_gens,
}

criterion_group! {
    name = bp_generators;
    config = Criterion::default();
    targets =
    bp_gens,
}

criterion_main!(pc_generators, bp_generators);
