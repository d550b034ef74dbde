use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lifegrid_core::edge::{refresh_border, EdgePolicy};
use lifegrid_core::seed::Seed;
use lifegrid_core::step::{step, Stepper};
use lifegrid_data::Grid;

fn seeded(size: usize) -> Grid {
    let seed = Seed::Random {
        seed: 42,
        density: 0.5,
    };
    let mut grid = seed.full_grid(size).unwrap();
    refresh_border(&mut grid, EdgePolicy::Toroidal);
    grid
}

fn bench_step_serial(c: &mut Criterion) {
    let src = seeded(512);
    let mut dst = Grid::padded(512, 512).unwrap();

    c.bench_function("step_serial_512", |b| {
        b.iter(|| {
            step(black_box(&src), &mut dst);
            black_box(dst.get(1, 1))
        })
    });
}

fn bench_step_banded(c: &mut Criterion) {
    let src = seeded(512);
    let mut dst = Grid::padded(512, 512).unwrap();
    let stepper = Stepper::threaded(512, 4).unwrap();

    c.bench_function("step_banded_512_x4", |b| {
        b.iter(|| {
            stepper.step(black_box(&src), &mut dst);
            black_box(dst.get(1, 1))
        })
    });
}

fn bench_refresh_toroidal(c: &mut Criterion) {
    let mut grid = seeded(1024);

    c.bench_function("refresh_toroidal_1024", |b| {
        b.iter(|| {
            refresh_border(black_box(&mut grid), EdgePolicy::Toroidal);
        })
    });
}

criterion_group!(
    benches,
    bench_step_serial,
    bench_step_banded,
    bench_refresh_toroidal
);
criterion_main!(benches);
