use std::hint::black_box;
use std::time::Instant;

use dive_common::{Vector2, ViewBounds};
use dive_stream::{DisplayList, SpatialIndex, StreamerConfig, WorldStreamer};

type Item = (usize, Vector2);

fn locate(item: &Item) -> Vector2 {
    item.1
}

fn make_index(item_count: usize, spacing: f32, grid_size: f32) -> SpatialIndex<Item> {
    let mut index = SpatialIndex::new(grid_size, locate as fn(&Item) -> Vector2)
        .expect("bench grid size is valid");
    let side = (item_count as f32).sqrt().ceil() as usize;
    for i in 0..item_count {
        let x = (i % side) as f32 * spacing;
        let y = (i / side) as f32 * spacing;
        index.add((i, Vector2::new(x, y)));
    }
    index
}

fn bench_radius_query(item_count: usize, radius: f32, iterations: usize) {
    let index = make_index(item_count, 4.0, 100.0);
    let center = Vector2::new(50.0, 50.0);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(index.radius_query(black_box(center), black_box(radius)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  radius query ({item_count} items, r={radius}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_viewport_sweep(frames: usize, scroll: f32) {
    let config = StreamerConfig::default().with_seed(1);
    let mut streamer =
        WorldStreamer::new(config, DisplayList::new()).expect("default config is valid");

    let start = Instant::now();
    for frame in 0..frames {
        let depth = frame as f32 * scroll;
        let bounds = ViewBounds::new(-960.0, depth, 1920.0, 1080.0);
        let _ = black_box(streamer.on_viewport_changed(black_box(bounds)));
        let cursor = Vector2::new(0.0, depth + 540.0);
        let _ = black_box(streamer.collect(cursor, 40.0));
        streamer.tick(cursor);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / frames as u32;
    println!(
        "  viewport sweep ({frames} frames, {scroll}/frame): {per_iter:?}/frame, total {elapsed:?}, indexed={}",
        streamer.indexed_count()
    );
}

fn main() {
    println!("=== Stream Benchmarks ===\n");

    println!("Radius query:");
    bench_radius_query(1_000, 40.0, 10_000);
    bench_radius_query(10_000, 40.0, 10_000);
    bench_radius_query(10_000, 200.0, 1_000);

    println!("\nViewport sweep (load, collect, tick):");
    bench_viewport_sweep(1_000, 10.0);
    bench_viewport_sweep(1_000, 100.0);
    bench_viewport_sweep(200, 1_000.0);

    println!("\n=== Done ===");
}
