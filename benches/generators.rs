use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use tile_mazes::{
    generators::{self, Carver, MazeAlgorithm},
    grid::Grid,
    placement::{MarkerKind, MarkerPlacer},
    units::{Height, Width},
};

fn grid_41() -> Grid {
    Grid::new(Width(41), Height(41)).unwrap()
}

fn bench_recursive_backtracker_maze_41(c: &mut Criterion) {
    let mut g = grid_41();
    let mut rng = XorShiftRng::seed_from_u64(41);
    c.bench_function("recursive_backtracker_maze_41", move |b| {
        b.iter(|| {
            g.reset_to_all_walls();
            generators::recursive_backtracker(&mut g, &mut rng)
        })
    });
}

fn bench_prims_maze_41(c: &mut Criterion) {
    let mut g = grid_41();
    let mut rng = XorShiftRng::seed_from_u64(41);
    c.bench_function("prims_maze_41", move |b| {
        b.iter(|| {
            g.reset_to_all_walls();
            generators::prims(&mut g, &mut rng)
        })
    });
}

fn bench_place_collectibles_41(c: &mut Criterion) {
    let mut g = grid_41();
    let mut rng = XorShiftRng::seed_from_u64(41);
    MazeAlgorithm::Prim.carver().carve(&mut g, &mut rng);
    let mut placer = MarkerPlacer::new();

    c.bench_function("place_collectibles_41", move |b| {
        b.iter(|| {
            placer.reset_occupancy();
            placer.place(&g, MarkerKind::Collectible, 50, &mut rng).unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_recursive_backtracker_maze_41,
    bench_prims_maze_41,
    bench_place_collectibles_41
);
criterion_main!(benches);
