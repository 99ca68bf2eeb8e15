/* =======================================================================
Arbiter is a generic adversarial-search engine.
======================================================================= */

//! The recursive search/walk dispatcher. `choice` and `chance` are the
//! only two entry points a game driver calls; which of alpha-beta
//! search, scripted playback, interactive prompting, or random walk
//! actually runs is decided here from the engine's current [`Mode`],
//! not by the caller.
//!
//! A game drives recursion itself: the `apply` closure passed to
//! `choice`/`chance` mutates the state for one candidate and, before
//! returning, makes whatever further `choice`/`chance` calls the game's
//! own rules require for the next ply. By the time `apply` returns,
//! `Engine::node_score` reflects the fully backed-up value of that
//! candidate's subtree, because every nested `choice` leaves its best
//! child applied (never rolled back) until its own caller rolls back
//! the whole branch.

use super::engine::defs::{BoundKind, Mode};
use super::engine::transposition::TTEntry;
use super::engine::{Engine, StateBuffer};
use crate::defs::{ChoiceIndex, ChoiceMask, MAX_PLY};
use crate::hash::HashAlgorithm;
use defs::SearchOutcome;

pub mod defs;

/// A game's per-candidate callback: apply move `index` to `state` (and
/// recurse into the next ply as the game's own rules require), return
/// whether `index` was legal. State is left unmutated when `false` is
/// returned.
pub type ApplyFn<'a, H, S> = dyn FnMut(&mut Engine<H>, &mut S, ChoiceIndex) -> bool + 'a;

/// Splits a 64-bit candidate mask roughly in half by bit position and
/// recurses into whichever half has more set bits, consuming a few
/// bits of randomness at each level. This avoids the bias of
/// `trailing_zeros`-style scans toward low-index moves when picking a
/// uniformly-ish random legal move for playout.
fn choose_bit(mask: u64, mut next_bits: impl FnMut(u32) -> u32) -> Option<u32> {
    if mask == 0 {
        return None;
    }
    let mut lo = 0u32;
    let mut hi = 63u32;
    let mut remaining = mask;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let lower_mask = if mid >= 63 {
            u64::MAX
        } else {
            (1u64 << (mid + 1)) - 1
        };
        let lower = remaining & lower_mask;
        let upper = remaining & !lower_mask;
        let lower_count = lower.count_ones();
        let upper_count = upper.count_ones();
        if lower_count == 0 {
            lo = mid + 1;
            remaining = upper;
            continue;
        }
        if upper_count == 0 {
            hi = mid;
            remaining = lower;
            continue;
        }
        let bit = next_bits(1) & 1;
        if bit == 0 {
            hi = mid;
            remaining = lower;
        } else {
            lo = mid + 1;
            remaining = upper;
        }
    }
    if mask & (1 << lo) != 0 {
        Some(lo)
    } else {
        None
    }
}

impl<H: HashAlgorithm> Engine<H> {
    /// Runs a full top-level search: resets search state, explores the
    /// tree via [`Engine::choice`], and snapshots the best line found.
    /// `research` carries the killer table over from a shallower
    /// preliminary pass (see the preliminary-search-increment design).
    pub fn search_root<S: StateBuffer>(
        &mut self,
        state: &mut S,
        rangestart: ChoiceIndex,
        mask: ChoiceMask,
        research: bool,
        apply: &mut ApplyFn<H, S>,
    ) -> SearchOutcome {
        let warmed = !research && self.run_preliminary_passes(state, rangestart, mask, apply);
        self.set_mode_search(research || warmed);
        let outcome = self.choice(state, rangestart, mask, apply);
        if self.best_seq.is_empty() {
            let cut = if self.choice_seq_transition > 0 {
                self.choice_seq_transition
            } else {
                self.choice_seq.len()
            };
            self.best_seq = self.choice_seq[..cut].to_vec();
        }
        self.play_cursor = 0;
        self.report(super::engine::defs::EngineReport::SearchFinished {
            depth: self.max_search_level,
            best_len: self.best_seq.len(),
        });
        outcome
    }

    /// When `Settings::preliminary_search_inc` is configured, runs one or
    /// more shallower searches before the real one, each left by the
    /// next at its own fresh position (every pass rolls its own applied
    /// line back before the next begins, so only the final, full-depth
    /// pass's move is ever left applied). The killer table survives
    /// across passes, so the final search inherits move-ordering hints
    /// instead of starting cold. Returns whether any pass ran, so the
    /// caller knows whether to carry the killer table into the real
    /// search too.
    fn run_preliminary_passes<S: StateBuffer>(
        &mut self,
        state: &mut S,
        rangestart: ChoiceIndex,
        mask: ChoiceMask,
        apply: &mut ApplyFn<H, S>,
    ) -> bool {
        let inc = match self.settings.preliminary_search_inc {
            Some(inc) if inc > 0 => inc,
            _ => return false,
        };
        let target = self.max_search_level;
        if target <= inc {
            return false;
        }
        let saved_depth = self.max_search_level;
        let mut depth = inc;
        let mut research = false;
        while depth < target {
            self.max_search_level = depth;
            self.set_mode_search(research);
            self.choice(state, rangestart, mask, apply);
            self.rollback(state, 0);
            research = true;
            depth += inc;
        }
        self.max_search_level = saved_depth;
        true
    }

    /// Pops the next move from the precomputed best sequence (`Play`
    /// mode) or asks the current player's interactive callback
    /// (`Interactive` mode), applying it via `apply`. Returns `false`
    /// if the sequence is exhausted or the callback chose an illegal
    /// index.
    pub fn choice<S: StateBuffer>(
        &mut self,
        state: &mut S,
        rangestart: ChoiceIndex,
        mask: ChoiceMask,
        apply: &mut ApplyFn<H, S>,
    ) -> SearchOutcome {
        match self.mode {
            Mode::Play => self.choice_play(state, rangestart, mask, apply),
            Mode::Interactive => self.choice_interactive(state, rangestart, mask, apply),
            Mode::Random => self.choice_random(state, rangestart, mask, apply),
            Mode::Search => self.choice_search(state, rangestart, mask, apply),
            Mode::Unknown => SearchOutcome::failure(),
        }
    }

    /// Weighted (or uniform, when `weights` is empty) average over the
    /// candidates in `mask`. Every child is explored and rolled back;
    /// the resulting expected value is written back as a score delta
    /// on the seeking player so callers can read it the same way they
    /// read a `choice` result, via `node_score`.
    pub fn chance<S: StateBuffer>(
        &mut self,
        state: &mut S,
        rangestart: ChoiceIndex,
        mask: ChoiceMask,
        weights: &[f64],
        apply: &mut ApplyFn<H, S>,
    ) -> SearchOutcome {
        if matches!(self.mode, Mode::Random) {
            return self.choice_random(state, rangestart, mask, apply);
        }
        let bits: Vec<u32> = (0..64).filter(|b| mask & (1 << b) != 0).collect();
        if bits.is_empty() {
            return SearchOutcome::failure();
        }
        let uniform = 1.0 / bits.len() as f64;
        let before = self.node_score();
        let mut expected = 0.0f64;
        let mut any_legal = false;
        let (save_alpha, save_beta) = (self.alpha, self.beta);
        self.alpha = i32::MIN;
        self.beta = i32::MAX;
        for (n, &b) in bits.iter().enumerate() {
            let idx = rangestart + b as ChoiceIndex;
            let top = self.journal.top();
            if apply(self, state, idx) {
                any_legal = true;
                let w = weights.get(n).copied().unwrap_or(uniform);
                expected += w * self.node_score() as f64;
            }
            self.rollback(state, top);
        }
        self.alpha = save_alpha;
        self.beta = save_beta;
        if !any_legal {
            return SearchOutcome::failure();
        }
        let delta = expected.round() as i32 - before;
        self.add_player_score(self.seeking_player, delta);
        SearchOutcome::of(self.node_score())
    }

    /// Pops the next index from the previously computed best sequence.
    /// Once `best_seq` is exhausted, runs a fresh root search from the
    /// current position to produce a new one (reporting its stats),
    /// then returns to `Play` mode before resuming from it. The
    /// sub-search already leaves its own best line applied to `state`
    /// (see the module doc comment), so the move it found is not
    /// replayed a second time here.
    fn choice_play<S: StateBuffer>(
        &mut self,
        state: &mut S,
        rangestart: ChoiceIndex,
        mask: ChoiceMask,
        apply: &mut ApplyFn<H, S>,
    ) -> SearchOutcome {
        if self.play_cursor >= self.best_seq.len() {
            let outcome = self.search_root(state, rangestart, mask, false, apply);
            self.set_mode_play();
            if !outcome.success {
                return SearchOutcome::failure();
            }
            self.play_cursor = self.best_seq.len();
            return outcome;
        }
        let idx = self.best_seq[self.play_cursor];
        if apply(self, state, idx) {
            self.play_cursor += 1;
            self.choice_seq.push(idx);
            SearchOutcome::of(self.node_score())
        } else {
            SearchOutcome::failure()
        }
    }

    fn choice_interactive<S: StateBuffer>(
        &mut self,
        state: &mut S,
        rangestart: ChoiceIndex,
        mask: ChoiceMask,
        apply: &mut ApplyFn<H, S>,
    ) -> SearchOutcome {
        let player = self.current_player;
        let picked = match self.player_settings[player].interactive.as_mut() {
            Some(cb) => cb(rangestart),
            None => return SearchOutcome::failure(),
        };
        let bit = picked - rangestart;
        if bit < 0 || bit >= 64 || mask & (1 << bit) == 0 {
            return SearchOutcome::failure();
        }
        if apply(self, state, picked) {
            self.choice_seq.push(picked);
            SearchOutcome::of(self.node_score())
        } else {
            SearchOutcome::failure()
        }
    }

    fn choice_random<S: StateBuffer>(
        &mut self,
        state: &mut S,
        rangestart: ChoiceIndex,
        mask: ChoiceMask,
        apply: &mut ApplyFn<H, S>,
    ) -> SearchOutcome {
        if self.max_walk_level >= 0 && self.choice_seq.len() as i8 >= self.max_walk_level {
            return SearchOutcome::failure();
        }
        let mut remaining = mask;
        loop {
            let bit = {
                let rng = &mut self.rng;
                choose_bit(remaining, |n| {
                    use rand_core::RngCore;
                    rng.next_u32() & ((1 << n) - 1).max(1)
                })
            };
            let bit = match bit {
                Some(b) => b,
                None => return SearchOutcome::failure(),
            };
            let idx = rangestart + bit as ChoiceIndex;
            if apply(self, state, idx) {
                self.choice_seq.push(idx);
                return SearchOutcome::of(self.node_score());
            }
            remaining &= !(1 << bit);
        }
    }

    fn choice_search<S: StateBuffer>(
        &mut self,
        state: &mut S,
        rangestart: ChoiceIndex,
        mask: ChoiceMask,
        apply: &mut ApplyFn<H, S>,
    ) -> SearchOutcome {
        let ply = self.choice_seq.len();
        let depth_budget = self.max_depth_for(self.seeking_player) as usize;
        if ply >= depth_budget || ply >= MAX_PLY {
            if self.max_walk_level != 0 {
                self.mode = Mode::Random;
                let out = self.choice_random(state, rangestart, mask, apply);
                self.mode = Mode::Search;
                return out;
            }
            return SearchOutcome::of(self.node_score());
        }

        let hash = self.current_hash();
        let verify = hash.wrapping_add(self.current_player as u32).wrapping_add(1);
        let remaining_depth = (depth_budget - ply) as i8;

        let mut ordered: Vec<u32> = Vec::new();
        let mut tried: ChoiceMask = 0;
        if let Some(entry) = self.tt[self.seeking_player].probe(hash, verify) {
            if entry.depth >= remaining_depth {
                match entry.bound {
                    BoundKind::Exact | BoundKind::Open => {
                        self.stats.revisits += 1;
                        return SearchOutcome::of(entry.score);
                    }
                    BoundKind::Upper if entry.score <= self.alpha => {
                        self.stats.revisits += 1;
                        return SearchOutcome::of(self.alpha);
                    }
                    BoundKind::Lower if entry.score >= self.beta => {
                        self.stats.revisits += 1;
                        return SearchOutcome::of(self.beta);
                    }
                    BoundKind::NoValidMoves => {
                        self.stats.revisits += 1;
                        return SearchOutcome::failure();
                    }
                    // Upper/Lower bound didn't satisfy the cutoff test against
                    // the current window; fall through to a full re-search,
                    // still taking the best-child hints below as ordering.
                    BoundKind::Upper | BoundKind::Lower => {}
                }
            }
            for slot in entry.best.iter().flatten() {
                let bit = (*slot - rangestart) as i64;
                if (0..64).contains(&bit) && mask & (1 << bit) != 0 && tried & (1 << bit) == 0 {
                    ordered.push(bit as u32);
                    tried |= 1 << bit;
                }
            }
        }
        let killer_bits = self.killer.mask_at(ply) & mask & !tried;
        for b in 0..64 {
            if killer_bits & (1 << b) != 0 {
                ordered.push(b);
                tried |= 1 << b;
            }
        }
        for b in 0..64 {
            if mask & (1 << b) != 0 && tried & (1 << b) == 0 {
                ordered.push(b);
            }
        }

        self.stats.visits += 1;
        // Inherit the window our parent has narrowed down to so far; it
        // was placed in these fields right before `apply` recursed into
        // us. Our own loop below keeps it updated for our remaining
        // siblings, and refreshes it again before each recursive call so
        // our children see it too.
        let mut alpha = self.alpha;
        let mut beta = self.beta;
        let maximizing = self.current_player == self.seeking_player;
        let mut best_score = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_idx: Option<ChoiceIndex> = None;
        let mut cut = false;

        for (child_no, b) in ordered.into_iter().enumerate() {
            let idx = rangestart + b as ChoiceIndex;
            let top = self.journal.top();
            self.choice_seq.push(idx);
            self.alpha = alpha;
            self.beta = beta;
            let legal = apply(self, state, idx);
            if legal {
                self.stats.choices += 1;
                let score = self.node_score();
                self.choice_seq.pop();
                self.rollback(state, top);
                let better = if maximizing {
                    score > best_score
                } else {
                    score < best_score
                };
                if better {
                    best_score = score;
                    best_idx = Some(idx);
                }
                if maximizing {
                    alpha = alpha.max(best_score);
                } else {
                    beta = beta.min(best_score);
                }
                if !self.settings.full_search && alpha >= beta {
                    self.killer.note_cutoff(ply, b);
                    self.stats.cutoffs += 1;
                    if child_no == 0 {
                        self.stats.early_cutoffs += 1;
                    }
                    cut = true;
                    break;
                }
            } else {
                self.choice_seq.pop();
                self.rollback(state, top);
            }
        }
        // Restore our own window for our parent's remaining siblings.
        self.alpha = alpha;
        self.beta = beta;

        let bound = match best_idx {
            None => BoundKind::NoValidMoves,
            Some(_) if cut && maximizing => BoundKind::Lower,
            Some(_) if cut => BoundKind::Upper,
            Some(_) => BoundKind::Exact,
        };

        let mut entry = TTEntry {
            verify,
            score: best_score,
            depth: remaining_depth,
            bound,
            best: [None, None],
        };
        if let Some(old) = self.tt[self.seeking_player].probe(hash, verify) {
            entry.best = old.best;
        }
        if let Some(idx) = best_idx {
            entry.note_best_child(idx);
            self.choice_seq.push(idx);
            apply(self, state, idx);
            self.tt[self.seeking_player].store(hash, verify, entry);
            SearchOutcome::of(self.node_score())
        } else {
            self.tt[self.seeking_player].store(hash, verify, entry);
            SearchOutcome::of(self.node_score())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choose_bit_picks_a_set_bit() {
        let mut ctr = 0u32;
        let mask: u64 = 0b1010_0000;
        let bit = choose_bit(mask, |n| {
            ctr = ctr.wrapping_add(1);
            ctr & ((1 << n) - 1).max(1)
        });
        assert!(bit == Some(5) || bit == Some(7));
    }

    #[test]
    fn choose_bit_empty_mask_is_none() {
        assert_eq!(choose_bit(0, |_| 0), None);
    }
}
