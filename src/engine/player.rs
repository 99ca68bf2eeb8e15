/* =======================================================================
Arbiter is a generic adversarial-search engine.
======================================================================= */

use crate::defs::ChoiceIndex;
use super::defs::Outcome;

/// Per-player interactive-move callback: given the game state bytes and
/// the candidate mask, returns the index the human/external player
/// picked. Boxed so different players can supply different interaction
/// strategies (stdin prompt, network, scripted replay for tests).
pub type InteractiveCallback = Box<dyn FnMut(ChoiceIndex) -> ChoiceIndex>;

/// Per-player configuration: search depth override and, if present, an
/// interactive callback that routes this player's moves outside the
/// search.
#[derive(Default)]
pub struct PlayerSettings {
    pub max_search_depth: Option<i8>,
    pub interactive: Option<InteractiveCallback>,
}

impl PlayerSettings {
    pub fn is_interactive(&self) -> bool {
        self.interactive.is_some()
    }
}

/// Per-player score state, always mutated through the engine's journal
/// so that branch rollback restores scores along with everything else.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerState {
    pub score: i32,
}

/// Computes the winner (or tie set) from final per-player scores. The
/// player with strictly maximal score wins; otherwise every player
/// sharing the maximum is reported as a tie.
pub fn compute_outcome(scores: &[i32]) -> Outcome {
    let max = scores.iter().copied().max().unwrap_or(0);
    let mut tied = 0u32;
    let mut winner = None;
    for (i, &s) in scores.iter().enumerate() {
        if s == max {
            tied |= 1 << i;
            winner = Some(i);
        }
    }
    if tied.count_ones() == 1 {
        Outcome::Won(winner.unwrap())
    } else {
        Outcome::Tied(tied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_max_wins() {
        assert_eq!(compute_outcome(&[3, 7, 1]), Outcome::Won(1));
    }

    #[test]
    fn tie_reported_as_bitmask() {
        assert_eq!(compute_outcome(&[5, 5, 1]), Outcome::Tied(0b011));
    }

    #[test]
    fn all_zero_is_a_full_tie() {
        assert_eq!(compute_outcome(&[0, 0]), Outcome::Tied(0b11));
    }
}
