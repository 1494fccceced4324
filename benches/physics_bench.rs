use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use celestial_impulse::{fracture::fragment_outline, *};
use std::hint::black_box;

fn prepare_world(body_count: usize, parallel: bool) -> PhysicsWorld {
    let mut world = PhysicsWorld::default();
    world.set_parallel_detection(parallel);
    let columns = (body_count as f64).sqrt().ceil() as usize;
    for i in 0..body_count {
        let position = DVec2::new((i % columns) as f64 * 25.0, (i / columns) as f64 * 25.0);
        let params = BodyParams::at(position).mass(10.0);
        let spawned = if i % 4 == 0 {
            world.add_asteroid(
                vec![
                    DVec2::new(-12.0, -12.0),
                    DVec2::new(12.0, -12.0),
                    DVec2::new(12.0, 12.0),
                    DVec2::new(-12.0, 12.0),
                ],
                params,
            )
        } else {
            world.add_moon(12.0, None, params)
        };
        black_box(spawned.ok());
    }
    world
}

fn bench_world_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_step");
    for &count in &[64usize, 256, 1024] {
        group.bench_with_input(
            BenchmarkId::new("sequential", count),
            &count,
            |b, &count| {
                b.iter(|| {
                    let mut world = prepare_world(count, false);
                    black_box(world.step());
                })
            },
        );
        group.bench_with_input(BenchmarkId::new("parallel", count), &count, |b, &count| {
            b.iter(|| {
                let mut world = prepare_world(count, true);
                black_box(world.step());
            })
        });
    }
    group.finish();
}

fn bench_narrowphase(c: &mut Criterion) {
    let mut group = c.benchmark_group("narrowphase");
    for &count in &[64usize, 256, 1024] {
        group.bench_with_input(BenchmarkId::new("detect", count), &count, |b, &count| {
            let mut world = prepare_world(count, false);
            b.iter(|| black_box(world.collect_contacts()))
        });
    }
    group.finish();
}

fn bench_fracture(c: &mut Criterion) {
    let mut group = c.benchmark_group("fracture");
    for &sides in &[6usize, 16, 64] {
        group.bench_with_input(BenchmarkId::new("outline", sides), &sides, |b, &sides| {
            let Ok(polygon) = ConvexPolygon::regular(sides, 100.0) else {
                return;
            };
            b.iter(|| black_box(fragment_outline(&polygon)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_world_step, bench_narrowphase, bench_fracture);
criterion_main!(benches);
