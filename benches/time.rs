//! Criterion benchmarks measure time of the clearly separated pieces of code.

use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use connect_four_mcts::game::{Board, Dimensions};
use connect_four_mcts::mcts::{random_playout, Config, SearchTree};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn sample_boards() -> Vec<Board> {
    [
        "......./......./......./......./......./.......",
        "......./......./......./..O..../..XO.../..XXO..",
        "......./......./O....../XO...../XXO..../XXOOX..",
        "OOXXOOX/XXOOXXO/OOXXOOX/XXOOXXO/OOXXOOX/XXOOXXO",
    ]
    .iter()
    .filter_map(|notation| Board::from_notation(notation).ok())
    .collect()
}

fn game_over(c: &mut Criterion) {
    let boards = sample_boards();
    c.bench_with_input(
        BenchmarkId::new("game over", format!("{} boards", boards.len())),
        &boards,
        |b, boards| {
            b.iter(|| {
                for board in boards {
                    let _ = criterion::black_box(board.game_over());
                }
            });
        },
    );
}

fn playouts(c: &mut Criterion) {
    let mut group = c.benchmark_group("Random playout");
    for (rows, columns) in [(6, 7), (8, 9), (16, 16)] {
        let Ok(dimensions) = Dimensions::new(rows, columns) else {
            continue;
        };
        let board = Board::new(dimensions);
        let mut rng = StdRng::seed_from_u64(0);
        group.bench_with_input(
            BenchmarkId::from_parameter(dimensions),
            &board,
            |b, board| {
                b.iter(|| criterion::black_box(random_playout(board, 0, &mut rng)));
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = rules;
    config = Criterion::default().sample_size(100);
    targets = game_over, playouts
}

fn search(c: &mut Criterion) {
    c.bench_function("search 10 ms from the empty board", |b| {
        b.iter(|| {
            let mut tree = SearchTree::new(
                Board::new(Dimensions::STANDARD),
                Config::default().with_seed(0),
            );
            let root = tree.root();
            tree.run_search(Duration::from_millis(10), root);
            criterion::black_box(tree.best_move())
        });
    });
}

criterion_group! {
    name = mcts;
    config = Criterion::default().sample_size(10);
    targets = search
}

criterion_main!(rules, mcts);
