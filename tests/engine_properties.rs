/* =======================================================================
Arbiter is a generic adversarial-search engine.
======================================================================= */

use arbiter::engine::defs::{EngineParams, Outcome};
use arbiter::games::{reversi, tictactoe};
use arbiter::hash::Murmur2Hasher;
use arbiter::journal::Journal;
use arbiter::Engine;

#[test]
fn tictactoe_depth_nine_seed_zero_is_a_draw() {
    let params = EngineParams {
        num_players: 2,
        hash_table_order: 16,
        max_search_level: 9,
        max_walk_level: -1,
    };
    let mut engine = Engine::<Murmur2Hasher>::new(params, 0).unwrap();
    engine.set_mode_search(false);
    tictactoe::play_game(&mut engine);
    assert_eq!(engine.winning_players(), Outcome::Tied(0b11));
}

#[test]
fn reversi_root_legal_moves_are_the_four_canonical_squares() {
    let state = reversi::Reversi::new();
    let mask = reversi::candidate_moves(&state, 0);

    let expected: u64 = [(2, 3), (3, 2), (4, 5), (5, 4)]
        .iter()
        .fold(0u64, |acc, &(x, y)| acc | (1u64 << (y * 8 + x)));

    assert_eq!(mask, expected);
}

#[test]
fn journal_round_trip_restores_bytes_and_hash() {
    let mut journal: Journal<Murmur2Hasher> = Journal::new();
    let mut buf = [0u8; 64];
    for (i, b) in buf.iter_mut().enumerate() {
        *b = i as u8;
    }
    let original = buf;
    let h0 = journal.current_hash();

    let top = journal.top();
    journal.write(&mut buf, 8, &[0xAA; 16]);
    let _h1 = journal.current_hash();
    journal.write(&mut buf, 0, &[0xBB; 4]);
    let _h2 = journal.current_hash();

    journal.rollback(&mut buf, top);
    assert_eq!(buf, original);
    assert_eq!(journal.current_hash(), h0);
}

#[test]
fn tictactoe_depth_nine_reports_nonzero_transposition_revisits() {
    let params = EngineParams {
        num_players: 2,
        hash_table_order: 18,
        max_search_level: 9,
        max_walk_level: -1,
    };
    let mut engine = Engine::<Murmur2Hasher>::new(params, 0).unwrap();
    engine.set_mode_search(false);
    tictactoe::play_game(&mut engine);
    assert!(engine.stats().revisits > 0);
}

#[test]
fn random_playout_is_reproducible_for_a_fixed_seed() {
    let params = EngineParams {
        num_players: 2,
        hash_table_order: 10,
        max_search_level: 0,
        max_walk_level: 9,
    };
    let run = |seed: u64| {
        let mut engine = Engine::<Murmur2Hasher>::new(params, seed).unwrap();
        engine.set_mode_search(false);
        let final_state = reversi::play_game(&mut engine);
        (engine.get_player_score(0), engine.get_player_score(1), final_state.0)
    };
    let a = run(42);
    let b = run(42);
    assert_eq!(a.0, b.0);
    assert_eq!(a.1, b.1);
    assert_eq!(a.2, b.2);
}
