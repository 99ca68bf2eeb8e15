/* =======================================================================
Arbiter is a generic adversarial-search engine.
======================================================================= */

use crate::defs::{ChoiceIndex, MAX_PLAYERS, MAX_SCORE};
use crate::engine::{Engine, StateBuffer};
use crate::hash::HashAlgorithm;

const BOARD_X: i32 = 3;
const BOARD_Y: i32 = 3;
const ALL_MASK: u32 = (1 << (BOARD_X * BOARD_Y)) - 1;

/// One `u32` bitmask per player, little-endian encoded into a flat byte
/// buffer so the engine's journal can save/restore/hash arbitrary
/// slices of it without any game-specific undo code.
pub struct TicTacToe(pub [u8; 4 * MAX_PLAYERS]);

impl TicTacToe {
    pub fn new() -> Self {
        Self([0u8; 4 * MAX_PLAYERS])
    }

    fn pieces(&self, player: usize) -> u32 {
        let o = player * 4;
        u32::from_le_bytes(self.0[o..o + 4].try_into().unwrap())
    }

    fn occupancy(&self) -> u32 {
        (0..MAX_PLAYERS).map(|p| self.pieces(p)).fold(0, |a, b| a | b)
    }

    /// Returns the winning player, if any of the eight tic-tac-toe
    /// lines is fully controlled by one player.
    fn winner(&self, num_players: usize) -> Option<usize> {
        const LINES: [u32; 8] = [
            0b111_000_000,
            0b000_111_000,
            0b000_000_111,
            0b100_100_100,
            0b010_010_010,
            0b001_001_001,
            0b100_010_001,
            0b001_010_100,
        ];
        for &line in LINES.iter() {
            for p in 0..num_players {
                if self.pieces(p) & line == line {
                    return Some(p);
                }
            }
        }
        None
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl StateBuffer for TicTacToe {
    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
    fn bytes(&self) -> &[u8] {
        &self.0
    }
}

fn make_move<H: HashAlgorithm>(engine: &mut Engine<H>, state: &mut TicTacToe, index: ChoiceIndex) -> bool {
    if index < 0 || index >= BOARD_X * BOARD_Y {
        return false;
    }
    let bit = 1u32 << index;
    if state.occupancy() & bit != 0 {
        return false;
    }
    let player = engine.current_player();
    let new_val = state.pieces(player) | bit;
    let offset = player * 4;
    engine.journal_write(state.bytes_mut(), offset, &new_val.to_le_bytes());

    if let Some(winner) = state.winner(engine.num_players()) {
        engine.set_player_score(winner, MAX_SCORE);
        engine.game_over();
        return true;
    }

    if engine.next_player() {
        play_turn(engine, state);
    }
    true
}

fn play_turn<H: HashAlgorithm>(engine: &mut Engine<H>, state: &mut TicTacToe) -> bool {
    let mask = (ALL_MASK & !state.occupancy()) as u64;
    if mask == 0 {
        engine.game_over();
        return false;
    }
    let mut apply = make_move::<H>;
    engine.choice(state, 0, mask, &mut apply).success
}

/// Runs one complete game from the empty board, returning the final
/// state for inspection (e.g. by tests). In `Search` mode, a single
/// `play_turn` call recurses all the way to a terminal node and back,
/// so the loop below only ever iterates more than once in `Play`/
/// `Interactive` mode, where each call advances exactly one ply.
pub fn play_game<H: HashAlgorithm>(engine: &mut Engine<H>) -> TicTacToe {
    let mut state = TicTacToe::new();
    loop {
        if state.winner(engine.num_players()).is_some() {
            break;
        }
        if state.occupancy() == ALL_MASK {
            break;
        }
        if !play_turn(engine, &mut state) {
            break;
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::defs::EngineParams;
    use crate::hash::Murmur2Hasher;

    #[test]
    fn winner_detects_top_row() {
        let mut s = TicTacToe::new();
        s.0[0..4].copy_from_slice(&0b111u32.to_le_bytes());
        assert_eq!(s.winner(2), Some(0));
    }

    #[test]
    fn no_winner_on_empty_board() {
        let s = TicTacToe::new();
        assert_eq!(s.winner(2), None);
    }

    #[test]
    fn depth_nine_full_search_from_empty_board_is_a_draw() {
        let params = EngineParams {
            num_players: 2,
            hash_table_order: 10,
            max_search_level: 9,
            max_walk_level: -1,
        };
        let mut engine = Engine::<Murmur2Hasher>::new(params, 0).unwrap();
        engine.set_mode_search(false);
        let final_state = play_game(&mut engine);
        assert_eq!(final_state.winner(2), None);
        assert_eq!(engine.get_player_score(0), engine.get_player_score(1));
    }
}
