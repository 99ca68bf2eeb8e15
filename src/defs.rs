/* =======================================================================
Arbiter is a generic adversarial-search engine.

Arbiter is written in the Rust programming language. Its search core
follows the classical alpha-beta-with-transposition-table design used by
most minimax-based game engines.

Arbiter is free software: you can redistribute it and/or modify it under
the terms of the GNU General Public License version 3 as published by
the Free Software Foundation.

Arbiter is distributed in the hope that it will be useful, but WITHOUT
ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License
for more details.
======================================================================= */

/// Maximum number of players a single engine instance can seat.
pub const MAX_PLAYERS: usize = 4;

/// Upper bound on search+walk recursion depth; sizes the per-ply stats
/// and killer-heuristic tables.
pub const MAX_PLY: usize = 64;

/// Score magnitude used to represent a won/lost game. Kept well below
/// i32::MAX so that per-player sums (up to MAX_PLAYERS terms) never
/// overflow.
pub const MAX_SCORE: i32 = 1_000_000;
pub const MIN_SCORE: i32 = -MAX_SCORE;

/// Index of a candidate move within the range passed to `choice`/`chance`.
pub type ChoiceIndex = i32;

/// A bitmask of candidate move indices, relative to `rangestart`.
pub type ChoiceMask = u64;

pub struct About;
impl About {
    pub const ENGINE: &'static str = "Arbiter";
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");
    pub const AUTHOR: &'static str = "Matt Voce";
    pub const WEBSITE: &'static str = "https://github.com/";
}
