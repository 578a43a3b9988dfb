//! # World Benchmark
//!
//! Frame-shaped workloads through the world facade:
//! - entity creation with and without growth
//! - a full `[0, max_id]` mask scan with component updates
//! - a deferred-destroy flush at the frame boundary
//!
//! Run with: `cargo bench --package bagel_core --bench world_benchmark`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use bagel_core::{bagel_components, World, WorldConfig};

#[derive(Clone, Copy, Debug, Default)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Clone, Copy, Debug, Default)]
struct Velocity {
    dx: f32,
    dy: f32,
}

#[derive(Clone, Copy, Debug, Default)]
struct BallTag;

bagel_components! {
    Position => Packed,
    Velocity => Packed,
    BallTag => Tag,
}

const COUNTS: [u32; 3] = [1_000, 10_000, 50_000];

/// Half the entities move; every 8th is a ball.
fn populated(count: u32) -> World {
    let mut world = World::with_capacity(count);
    for i in 0..count {
        let Ok(entity) = world.create_entity() else {
            break;
        };
        let _ = world.add_component(entity, Position::default());
        if i % 2 == 0 {
            let _ = world.add_component(entity, Velocity { dx: 1.0, dy: 0.5 });
        }
        if i % 8 == 0 {
            let _ = world.add_component(entity, BallTag);
        }
    }
    world
}

/// Benchmark: Create entities into a pre-sized vs. a growing world.
fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_entity");

    for count in COUNTS {
        group.bench_with_input(BenchmarkId::new("presized", count), &count, |b, &count| {
            b.iter(|| {
                let Ok(mut world) = World::new(WorldConfig::fixed(count)) else {
                    return 0;
                };
                for _ in 0..count {
                    let _ = black_box(world.create_entity());
                }
                world.live_count()
            });
        });

        group.bench_with_input(BenchmarkId::new("growing", count), &count, |b, &count| {
            b.iter(|| {
                let mut world = World::with_capacity(1);
                for _ in 0..count {
                    let _ = black_box(world.create_entity());
                }
                world.live_count()
            });
        });
    }

    group.finish();
}

/// Benchmark: Movement over a mask query.
fn bench_movement(c: &mut Criterion) {
    let mut group = c.benchmark_group("movement_query");

    for count in COUNTS {
        let mut world = populated(count);
        group.bench_function(BenchmarkId::from_parameter(count), |b| {
            b.iter(|| {
                for entity in world.query_with::<(Position, Velocity)>() {
                    let vel = *world.get_component::<Velocity>(entity);
                    let pos = world.get_component_mut::<Position>(entity);
                    pos.x += vel.dx;
                    pos.y += vel.dy;
                }
            });
        });
    }

    group.finish();
}

/// Benchmark: Queue a destroy for every ball, then flush.
fn bench_step_flush(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_flush");

    for count in COUNTS {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_with_setup(
                || populated(count),
                |mut world| {
                    for entity in world.query_with::<(BallTag,)>() {
                        world.commands().destroy(entity);
                    }
                    black_box(world.step())
                },
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_create, bench_movement, bench_step_flush);
criterion_main!(benches);
