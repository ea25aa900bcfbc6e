//! Benchmarks for placement checks and swap resolution.
//!
//! Run with: `cargo bench -p pasta-sink`
//!
//! Results are saved to `target/criterion/` with HTML reports.
//!
//! ## Benchmark Groups
//!
//! - `placement`: `can_place` and first-free-anchor search on crowded sinks
//! - `swap`: swap plan search for singles and blocks, solvable and not

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pasta_sink::clock::ManualClock;
use pasta_sink::sink::{
    Cell, LayoutMode, SinkState, Tray, TraySize, can_place, find_swap_plan, first_free_anchor,
};

// ============================================================================
// Test Data
// ============================================================================

/// Builds a sink from `(anchor, size)` pairs.
fn sink(layout: LayoutMode, trays: &[(u8, TraySize)]) -> Vec<Tray> {
    let mut state = SinkState::with_clock(ManualClock::new(0));
    for &(anchor, size) in trays {
        let _ = state.place_tray(Cell::new(anchor), size, layout);
    }
    state.trays().to_vec()
}

/// One block plus singles on every remaining cell but one.
fn crowded_wide() -> Vec<Tray> {
    sink(
        LayoutMode::Wide,
        &[
            (0, TraySize::ExtraLarge),
            (2, TraySize::Regular),
            (3, TraySize::Large),
            (6, TraySize::Regular),
        ],
    )
}

/// Eight singles.
fn full_of_singles(layout: LayoutMode) -> Vec<Tray> {
    let trays: Vec<(u8, TraySize)> = (0..8)
        .map(|i| (i, if i % 2 == 0 { TraySize::Regular } else { TraySize::Large }))
        .collect();
    sink(layout, &trays)
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement");

    let crowded = crowded_wide();
    group.bench_function("can_place_block_crowded", |b| {
        b.iter(|| {
            can_place(
                black_box(&crowded),
                black_box(Cell::new(2)),
                TraySize::ExtraLarge,
                LayoutMode::Wide,
                &[],
            )
        });
    });

    for layout in [LayoutMode::Wide, LayoutMode::Narrow] {
        let trays = sink(layout, &[(0, TraySize::Regular), (3, TraySize::Large)]);
        group.bench_with_input(
            BenchmarkId::new("first_free_block", layout.as_str()),
            &trays,
            |b, trays| {
                b.iter(|| first_free_anchor(black_box(trays), TraySize::ExtraLarge, layout, &[]));
            },
        );
    }

    group.finish();
}

fn bench_swap(c: &mut Criterion) {
    let mut group = c.benchmark_group("swap");

    for layout in [LayoutMode::Wide, LayoutMode::Narrow] {
        let trays = full_of_singles(layout);
        let dragging = trays[0].id;
        group.bench_with_input(
            BenchmarkId::new("single_onto_single", layout.as_str()),
            &trays,
            |b, trays| {
                b.iter(|| find_swap_plan(black_box(trays), dragging, Cell::new(7), layout));
            },
        );
    }

    let block_over_singles = sink(
        LayoutMode::Wide,
        &[
            (2, TraySize::ExtraLarge),
            (0, TraySize::Regular),
            (1, TraySize::Large),
            (4, TraySize::Regular),
            (5, TraySize::Large),
        ],
    );
    let block = block_over_singles[0].id;
    group.bench_function("block_displaces_four", |b| {
        b.iter(|| {
            find_swap_plan(black_box(&block_over_singles), block, Cell::new(0), LayoutMode::Wide)
        });
    });

    let mut unsolvable = crowded_wide();
    unsolvable.extend(sink(LayoutMode::Wide, &[(7, TraySize::Regular)]));
    let dragging = unsolvable[unsolvable.len() - 1].id;
    group.bench_function("unsolvable", |b| {
        b.iter(|| find_swap_plan(black_box(&unsolvable), dragging, Cell::new(1), LayoutMode::Wide));
    });

    group.finish();
}

criterion_group!(benches, bench_placement, bench_swap);
criterion_main!(benches);
