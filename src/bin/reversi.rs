/* =======================================================================
Arbiter is a generic adversarial-search engine.
======================================================================= */

use arbiter::engine::defs::EngineParams;
use arbiter::games::reversi;
use arbiter::hash::Murmur2Hasher;
use arbiter::misc::cmdline::CmdLine;
use arbiter::Engine;

fn main() {
    let cmdline = CmdLine::new();

    let params = EngineParams {
        num_players: cmdline.players().unwrap_or(2),
        hash_table_order: cmdline.hash_order().unwrap_or(20),
        max_search_level: cmdline.depth().unwrap_or(8),
        max_walk_level: cmdline.walk().unwrap_or(-1),
    };

    let mut engine = Engine::<Murmur2Hasher>::new(params, cmdline.random_seed().unwrap_or(0))
        .unwrap_or_else(|e| panic!("{e}"));
    engine.settings_mut().quiet = cmdline.quiet();
    engine.settings_mut().full_search = cmdline.full_search();
    engine.settings_mut().preliminary_search_inc = cmdline.prelim_inc();

    engine.set_mode_search(false);
    let final_state = reversi::play_game(&mut engine);

    match engine.winning_players() {
        arbiter::engine::defs::Outcome::Won(p) => println!("Player {p} wins."),
        arbiter::engine::defs::Outcome::Tied(mask) => println!("Tied players: {mask:#06b}"),
    }
    let _ = final_state;
}
