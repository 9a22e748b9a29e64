use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use fifteen_benchmarks::{regime_budget_limited, regime_six_moves};
use fifteen_kernel::board::grid::{neighbor_moves, Grid};
use fifteen_kernel::board::heuristic::manhattan;
use fifteen_search::frontier::Frontier;
use fifteen_search::node::FrontierKey;
use fifteen_search::search::solve;

// ---------------------------------------------------------------------------
// Heuristic
// ---------------------------------------------------------------------------

fn bench_manhattan(c: &mut Criterion) {
    let grid = regime_six_moves().grid;
    c.bench_function("manhattan", |b| b.iter(|| manhattan(black_box(&grid))));
}

// ---------------------------------------------------------------------------
// Frontier push/pop
// ---------------------------------------------------------------------------

fn bench_frontier(c: &mut Criterion) {
    let mut group = c.benchmark_group("frontier_push_pop");
    for &size in &[10u64, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &n| {
            b.iter_batched(
                || {
                    (1..=n)
                        .map(|id| FrontierKey {
                            total_cost: u32::try_from(id % 17).unwrap_or(0),
                            id,
                        })
                        .collect::<Vec<_>>()
                },
                |keys| {
                    let mut frontier = Frontier::new();
                    for key in keys {
                        frontier.push(key);
                    }
                    while let Some(key) = frontier.pop() {
                        black_box(key);
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Expansion: legal moves + child grid + key + heuristic
// ---------------------------------------------------------------------------

fn bench_expand(c: &mut Criterion) {
    let grid = regime_six_moves().grid;
    let Some(blank) = grid.find_blank() else {
        return;
    };
    c.bench_function("expand_children", |b| {
        b.iter(|| {
            for mv in neighbor_moves(black_box(blank)) {
                let (child, tile): (Grid, u8) = grid.apply_move(blank, mv.target);
                black_box((child.canonical_key(), manhattan(&child), tile));
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Trace serialization
// ---------------------------------------------------------------------------

fn bench_trace_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace_serialization");
    for regime in [regime_six_moves(), regime_budget_limited()] {
        let Ok(result) = solve(&regime.grid, &regime.policy) else {
            continue;
        };
        group.bench_with_input(
            BenchmarkId::new(regime.name, result.trace.len()),
            &result.trace,
            |b, trace| {
                b.iter(|| black_box(trace.to_canonical_json_bytes().expect("serialization")));
            },
        );
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Criterion harness
// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    bench_manhattan,
    bench_frontier,
    bench_expand,
    bench_trace_serialization,
);
criterion_main!(benches);
