/* =======================================================================
Arbiter is a generic adversarial-search engine.
======================================================================= */

//! The engine handle: owns the journal, per-player transposition
//! tables, search statistics, player state, and the mode machine. All
//! public API described in the engine's external interface is exposed
//! as inherent methods on [`Engine`].

pub mod defs;
pub mod player;
pub mod stats;
pub mod transposition;

use crate::defs::{ChoiceIndex, MAX_PLAYERS};
use crate::hash::HashAlgorithm;
use crate::journal::Journal;
use defs::{EngineError, EngineParams, EngineReport, ErrFatal, Mode, Outcome, Settings};
use player::{compute_outcome, PlayerSettings, PlayerState};
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use stats::{KillerTable, SearchStats};
use transposition::TT;

/// Offset of the current-player index within the journal's global
/// register file (see `crate::journal::Journal::write_global`).
const GLOBAL_CURRENT_PLAYER: usize = 0;
/// Base offset of the per-player score registers; player `p`'s score
/// lives at `GLOBAL_SCORE_BASE + p * 4`.
const GLOBAL_SCORE_BASE: usize = 4;

/// Any type usable as game state must expose itself as a flat byte
/// buffer so the journal can save/restore/hash arbitrary regions of it
/// without the game driver hand-rolling undo logic.
pub trait StateBuffer {
    fn bytes_mut(&mut self) -> &mut [u8];
    fn bytes(&self) -> &[u8];
}

impl<const N: usize> StateBuffer for [u8; N] {
    fn bytes_mut(&mut self) -> &mut [u8] {
        self
    }
    fn bytes(&self) -> &[u8] {
        self
    }
}

/// The engine handle. Generic over the hash algorithm selected at
/// compile time (see [`crate::hash::HashAlgorithm`]); not generic over
/// the game, since a game is just a closure passed per call to
/// [`Engine::choice`]/[`Engine::chance`].
pub struct Engine<H> {
    pub(crate) journal: crate::journal::Journal<H>,
    pub(crate) tt: Vec<TT>,
    pub(crate) stats: SearchStats,
    pub(crate) killer: KillerTable,

    pub(crate) num_players: usize,
    pub(crate) current_player: usize,
    pub(crate) seeking_player: usize,
    pub(crate) player_state: [PlayerState; MAX_PLAYERS],
    pub(crate) player_settings: Vec<PlayerSettings>,

    pub(crate) max_search_level: i8,
    pub(crate) max_walk_level: i8,

    pub(crate) mode: Mode,
    pub(crate) settings: Settings,

    pub(crate) choice_seq: Vec<ChoiceIndex>,
    pub(crate) best_seq: Vec<ChoiceIndex>,
    pub(crate) choice_seq_transition: usize,
    /// Index of the next unconsumed move in `best_seq`, for `Mode::Play`.
    /// Reset to 0 whenever a fresh `best_seq` starts being consumed.
    pub(crate) play_cursor: usize,

    /// Current alpha-beta window, from the seeking player's viewpoint.
    /// Set by a node before recursing into a child (via `apply`), so the
    /// child inherits the tightened window its siblings have already
    /// produced; restored by the node's own loop before trying its next
    /// sibling.
    pub(crate) alpha: i32,
    pub(crate) beta: i32,

    pub(crate) rng: ChaCha8Rng,
    pub(crate) reports: Vec<EngineReport>,
}

impl<H: HashAlgorithm> Engine<H> {
    /// Constructs a new engine. Mirrors the reference engine's `ai_init`:
    /// idempotent in the sense that every call produces an independent,
    /// fully-initialized value rather than mutating shared process state.
    pub fn new(params: EngineParams, seed: u64) -> Result<Self, EngineError> {
        if params.num_players == 0 || params.num_players > MAX_PLAYERS {
            return Err(EngineError::Configuration(ErrFatal::BAD_PLAYER_COUNT));
        }
        if params.max_search_level < 0 {
            return Err(EngineError::Configuration(ErrFatal::BAD_SEARCH_LEVEL));
        }

        let tt = (0..params.num_players)
            .map(|_| TT::new(params.hash_table_order))
            .collect();
        let player_settings = (0..params.num_players)
            .map(|_| PlayerSettings::default())
            .collect();

        Ok(Self {
            journal: Journal::new(),
            tt,
            stats: SearchStats::new(),
            killer: KillerTable::new(),
            num_players: params.num_players,
            current_player: 0,
            seeking_player: 0,
            player_state: [PlayerState::default(); MAX_PLAYERS],
            player_settings,
            max_search_level: params.max_search_level,
            max_walk_level: params.max_walk_level,
            mode: Mode::Unknown,
            settings: Settings::default(),
            choice_seq: Vec::new(),
            best_seq: Vec::new(),
            choice_seq_transition: 0,
            play_cursor: 0,
            alpha: i32::MIN,
            beta: i32::MAX,
            rng: ChaCha8Rng::seed_from_u64(seed),
            reports: Vec::new(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn num_players(&self) -> usize {
        self.num_players
    }

    pub fn get_mode(&self) -> Mode {
        self.mode
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.mode, Mode::Search | Mode::Random)
    }

    pub fn current_hash(&self) -> crate::hash::HashCode {
        self.journal.current_hash()
    }

    pub fn current_player(&self) -> usize {
        self.current_player
    }

    pub fn seeking_player(&self) -> usize {
        self.seeking_player
    }

    pub fn player_settings(&mut self, player: usize) -> &mut PlayerSettings {
        &mut self.player_settings[player]
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn drain_reports(&mut self) -> Vec<EngineReport> {
        std::mem::take(&mut self.reports)
    }

    pub(crate) fn report(&mut self, r: EngineReport) {
        if !self.settings.quiet {
            self.reports.push(r);
        }
    }

    /// Sets the current player directly, bypassing the journal. Used
    /// only outside search (engine setup, or by a game driver advancing
    /// turns in `Mode::Play`/`Mode::Interactive`, where rollback never
    /// applies).
    pub fn set_current_player(&mut self, player: usize) -> bool {
        if player >= self.num_players {
            return false;
        }
        self.journal
            .set_global_raw(GLOBAL_CURRENT_PLAYER, &(player as u32).to_ne_bytes());
        self.current_player = player;
        true
    }

    /// Advances to the next player in round-robin order, journaled so a
    /// search branch can roll it back. Returns `true` unless this wraps
    /// back to the seeking player without an intervening search
    /// transition being recorded (the caller still receives `true`; the
    /// wrap itself is not treated specially here, matching the
    /// reference `ai_next_player`, which always succeeds for a
    /// round-robin of `num_players >= 1`).
    pub fn next_player(&mut self) -> bool {
        let next = (self.current_player + 1) % self.num_players;
        let bytes = (next as u32).to_ne_bytes();
        if self.is_searching() {
            self.journal.write_global(GLOBAL_CURRENT_PLAYER, &bytes);
        } else {
            self.journal.set_global_raw(GLOBAL_CURRENT_PLAYER, &bytes);
        }
        self.current_player = next;
        if next != self.seeking_player && self.choice_seq_transition == 0 {
            self.choice_seq_transition = self.choice_seq.len();
        }
        true
    }

    /// Journaled write into a game-state buffer. Games route every
    /// mutation through this (never writing `state.bytes_mut()`
    /// directly) so a search branch can be rolled back byte-for-byte.
    pub fn journal_write(&mut self, buf: &mut [u8], offset: usize, src: &[u8]) {
        self.journal.write(buf, offset, src);
    }

    /// Journaled write of a game-owned global scalar that does not
    /// belong to the state buffer. `offset` must be at or beyond
    /// [`crate::journal::ENGINE_GLOBALS_RESERVED`]; the region below
    /// that is reserved for the engine's own current-player/score
    /// registers.
    pub fn journal_write_global(&mut self, offset: usize, src: &[u8]) {
        self.journal.write_global(offset, src);
    }

    /// Rolls the journal back to `top`, restoring both `state`'s bytes
    /// and the engine-owned globals (current player, per-player
    /// scores) the journal tracks alongside it. Every rollback a search
    /// branch performs must go through this rather than calling
    /// `Journal::rollback` directly, or the engine's cached
    /// `current_player`/score fields drift from the journal's restored
    /// values.
    pub(crate) fn rollback<S: StateBuffer>(&mut self, state: &mut S, top: usize) {
        self.journal.rollback(state.bytes_mut(), top);
        self.resync_globals();
    }

    fn resync_globals(&mut self) {
        let cp = self.journal.read_global(GLOBAL_CURRENT_PLAYER, 4);
        self.current_player = u32::from_ne_bytes(cp.try_into().unwrap()) as usize;
        for p in 0..self.num_players {
            let bytes = self.journal.read_global(GLOBAL_SCORE_BASE + p * 4, 4);
            self.player_state[p].score = i32::from_ne_bytes(bytes.try_into().unwrap());
        }
    }

    pub fn get_player_score(&self, player: usize) -> i32 {
        self.player_state[player].score
    }

    pub fn set_player_score(&mut self, player: usize, score: i32) {
        let offset = GLOBAL_SCORE_BASE + player * 4;
        let bytes = score.to_ne_bytes();
        if self.is_searching() {
            self.journal.write_global(offset, &bytes);
        } else {
            self.journal.set_global_raw(offset, &bytes);
        }
        self.player_state[player].score = score;
    }

    pub fn add_player_score(&mut self, player: usize, delta: i32) {
        let new_score = self.player_state[player].score + delta;
        self.set_player_score(player, new_score);
    }

    /// The scalar node score from the seeking player's viewpoint:
    /// `score[seeking] - sum(score[i] for i != seeking)`.
    pub(crate) fn node_score(&self) -> i32 {
        let seeking = self.seeking_player;
        let mut total = 0i32;
        for i in 0..self.num_players {
            if i == seeking {
                total += self.player_state[i].score;
            } else {
                total -= self.player_state[i].score;
            }
        }
        total
    }

    /// Called by the game driver at terminal nodes. Updating scores is
    /// the driver's job (via `set_player_score`/`add_player_score`);
    /// `game_over` just marks the node as decided so the stats can
    /// attribute a win/draw.
    pub fn game_over(&mut self) {
        let scores: Vec<i32> = (0..self.num_players)
            .map(|p| self.player_state[p].score)
            .collect();
        match compute_outcome(&scores) {
            Outcome::Won(p) => {
                self.stats.wins[p] += 1;
                let runner_up = scores
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != p)
                    .map(|(_, &s)| s)
                    .max()
                    .unwrap_or(0);
                self.stats.advantage[p] += (scores[p] - runner_up) as i64;
            }
            Outcome::Tied(_) => self.stats.draws += 1,
        }
    }

    pub fn winning_players(&self) -> Outcome {
        let scores: Vec<i32> = (0..self.num_players)
            .map(|p| self.player_state[p].score)
            .collect();
        compute_outcome(&scores)
    }

    /// Commits the journal and enters `Play` or `Interactive` mode
    /// depending on whether the current player has a registered
    /// interactive callback.
    pub fn set_mode_play(&mut self) {
        self.journal.commit();
        self.seeking_player = self.current_player;
        self.play_cursor = 0;
        self.mode = if self.player_settings[self.current_player].is_interactive() {
            Mode::Interactive
        } else {
            Mode::Play
        };
    }

    /// Commits the journal and enters `Search` mode, resetting search
    /// parameters and per-search bookkeeping. Killer heuristics survive
    /// when `research` is true (used by the preliminary-search
    /// increment to warm-start a deeper re-search).
    pub fn set_mode_search(&mut self, research: bool) {
        self.journal.commit();
        self.mode = Mode::Search;
        self.seeking_player = self.current_player;
        self.stats.reset();
        if !research {
            self.killer.clear();
        }
        self.best_seq.clear();
        self.choice_seq.clear();
        self.choice_seq_transition = 0;
        self.alpha = i32::MIN;
        self.beta = i32::MAX;
    }

    pub(crate) fn max_depth_for(&self, player: usize) -> i8 {
        self.player_settings[player]
            .max_search_depth
            .unwrap_or(self.max_search_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Murmur2Hasher;

    #[test]
    fn new_rejects_bad_player_count() {
        let params = EngineParams {
            num_players: 0,
            ..Default::default()
        };
        assert!(Engine::<Murmur2Hasher>::new(params, 0).is_err());
    }

    #[test]
    fn next_player_wraps_round_robin() {
        let params = EngineParams {
            num_players: 3,
            ..Default::default()
        };
        let mut e = Engine::<Murmur2Hasher>::new(params, 0).unwrap();
        assert_eq!(e.current_player(), 0);
        e.next_player();
        assert_eq!(e.current_player(), 1);
        e.next_player();
        assert_eq!(e.current_player(), 2);
        e.next_player();
        assert_eq!(e.current_player(), 0);
    }

    #[test]
    fn scores_round_trip() {
        let params = EngineParams::default();
        let mut e = Engine::<Murmur2Hasher>::new(params, 0).unwrap();
        e.set_player_score(0, 5);
        e.add_player_score(0, 3);
        assert_eq!(e.get_player_score(0), 8);
    }

    #[test]
    fn winner_is_unique_max() {
        let params = EngineParams::default();
        let mut e = Engine::<Murmur2Hasher>::new(params, 0).unwrap();
        e.set_player_score(0, 10);
        e.set_player_score(1, 3);
        assert_eq!(e.winning_players(), Outcome::Won(0));
    }
}
