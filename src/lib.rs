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

//! A generic adversarial-search engine: alpha-beta minimax over an
//! arbitrary game's candidate moves, with transposition-table
//! memoization, a killer-move heuristic, journaled byte-level undo,
//! incremental content hashing, and chance nodes for games with a
//! random element.
//!
//! A game implements its rules as a handful of free functions
//! operating on a flat byte buffer ([`engine::StateBuffer`]) and drives
//! recursion itself by calling [`engine::Engine::choice`] /
//! [`engine::Engine::chance`] for each decision point; see
//! [`games::tictactoe`] and [`games::reversi`] for worked examples.

pub mod defs;
pub mod engine;
pub mod games;
pub mod hash;
pub mod journal;
pub mod misc;
pub mod search;

pub use engine::{Engine, StateBuffer};
pub use hash::{CrcHasher, Murmur2Hasher};
