/* =======================================================================
Arbiter is a generic adversarial-search engine.
======================================================================= */

use arbiter::engine::defs::EngineParams;
use arbiter::games::{reversi, tictactoe};
use arbiter::hash::Murmur2Hasher;
use arbiter::Engine;
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_tictactoe_full_search(c: &mut Criterion) {
    c.bench_function("tictactoe depth 9 full search", |b| {
        b.iter(|| {
            let params = EngineParams {
                num_players: 2,
                hash_table_order: 12,
                max_search_level: 9,
                max_walk_level: -1,
            };
            let mut engine = Engine::<Murmur2Hasher>::new(params, 0).unwrap();
            engine.set_mode_search(false);
            tictactoe::play_game(&mut engine)
        })
    });
}

fn bench_reversi_shallow_search(c: &mut Criterion) {
    c.bench_function("reversi depth 4 opening search", |b| {
        b.iter(|| {
            let params = EngineParams {
                num_players: 2,
                hash_table_order: 16,
                max_search_level: 4,
                max_walk_level: -1,
            };
            let mut engine = Engine::<Murmur2Hasher>::new(params, 0).unwrap();
            engine.set_mode_search(false);
            reversi::play_game(&mut engine)
        })
    });
}

criterion_group!(benches, bench_tictactoe_full_search, bench_reversi_shallow_search);
criterion_main!(benches);
