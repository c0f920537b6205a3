// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Benchmarks for the full engine step
//!
//! These benchmarks measure:
//! - Step cost for towers of increasing height resting on the ground
//! - Integration alone for free-falling bodies

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tower_physics::body::BodyRegistry;
use tower_physics::integration::{integrate_bodies, SemiImplicitEuler};
use tower_physics::{PhysicsEngine, RigidBody, TetrominoShape, Vector2};

const DT: f64 = 1.0 / 60.0;

fn tower_engine(pieces: usize) -> PhysicsEngine {
    let engine = PhysicsEngine::default();
    engine
        .create_body(RigidBody::new_static(Vector2::new(0.0, -10.0), 40.0, 1.0))
        .unwrap();
    for i in 0..pieces {
        let shape = TetrominoShape::ALL[i % TetrominoShape::ALL.len()];
        let spawn = Vector2::new((i % 8) as f64 * 4.0 - 14.0, (i / 8) as f64 * 2.5 - 8.0);
        engine.spawn_tetromino(shape, spawn, 0.0).unwrap();
    }
    engine
}

fn bench_engine_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_step");

    for pieces in [4usize, 16, 64].iter() {
        group.throughput(Throughput::Elements((*pieces * 4) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(pieces), pieces, |b, &pieces| {
            let engine = tower_engine(pieces);
            b.iter(|| engine.update(black_box(DT)).unwrap());
        });
    }

    group.finish();
}

fn bench_integration(c: &mut Criterion) {
    let mut group = c.benchmark_group("integration");
    let integrator = SemiImplicitEuler::default();

    for count in [100usize, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let mut registry = BodyRegistry::new();
            for i in 0..count {
                registry.insert(RigidBody::new(Vector2::new(i as f64, 0.0), 1.0, 1.0, 1.0));
            }
            b.iter(|| {
                integrate_bodies(&integrator, &mut registry, black_box(Vector2::new(0.0, -9.8)), DT)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_engine_step, bench_integration);
criterion_main!(benches);
