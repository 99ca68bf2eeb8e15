/* =======================================================================
Arbiter is a generic adversarial-search engine.
======================================================================= */

use std::fmt;

// This struct holds messages that are reported on fatal engine errors.
// These should never happen; if they do the engine is in an unknown
// state and the caller should treat it as unrecoverable.
pub struct ErrFatal;
impl ErrFatal {
    pub const BAD_PLAYER_COUNT: &'static str = "num_players must be in 1..=MAX_PLAYERS.";
    pub const BAD_SEARCH_LEVEL: &'static str = "max_search_level exceeds the preallocated ply budget.";
    pub const NO_INTERACTIVE_CALLBACK: &'static str = "Mode is Interactive but player has no callback.";
}

pub struct ErrNormal;
impl ErrNormal {
    pub const NOT_A_PLAYER: &'static str = "Player index is out of range for this engine.";
}

/// Fatal configuration errors surfaced from [`crate::engine::Engine::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    Configuration(&'static str),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Configuration(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Parameters accepted by [`crate::engine::Engine::new`].
#[derive(Clone, Copy, Debug)]
pub struct EngineParams {
    pub num_players: usize,
    pub hash_table_order: u32,
    pub max_search_level: i8,
    pub max_walk_level: i8,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            num_players: 2,
            hash_table_order: 22,
            max_search_level: 10,
            max_walk_level: -1,
        }
    }
}

/// The engine's runtime-tunable settings (as opposed to the fixed
/// construction-time [`EngineParams`]). Mirrors the teacher's `Settings`
/// struct: values a CLI driver flips on or off without reallocating the
/// engine's backing arrays.
#[derive(Clone, Copy, Debug)]
pub struct Settings {
    pub quiet: bool,
    pub full_search: bool,
    pub preliminary_search_inc: Option<i8>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quiet: true,
            full_search: false,
            preliminary_search_inc: None,
        }
    }
}

/// Engine execution mode. Mutations are journaled only while the mode is
/// `Search` or `Random`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Unknown,
    Interactive,
    Play,
    Search,
    Random,
}

/// Classification of a transposition-table entry's score relative to the
/// search window that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundKind {
    /// Node is still being evaluated; never looked up as conclusive.
    Open,
    /// `score` is the true minimax value.
    Exact,
    /// `score` is an upper bound: true value <= score.
    Upper,
    /// `score` is a lower bound: true value >= score.
    Lower,
    /// Every candidate move was illegal; no further search applies here.
    NoValidMoves,
}

/// Winner computation result for [`crate::engine::Engine::winning_players`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Won(usize),
    /// Bitmask of players tied for the maximal score (popcount >= 2).
    Tied(u32),
}

/// Reports the engine emits during search, drained synchronously by the
/// caller (see [`crate::engine::Engine::drain_reports`]). Stands in for
/// the teacher's channel-based `Information`/`SearchReport` pair, which
/// this single-threaded engine has no need to carry across threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineReport {
    SearchFinished { depth: i8, best_len: usize },
    InfoString(String),
}
