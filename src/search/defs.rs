/* =======================================================================
Arbiter is a generic adversarial-search engine.
======================================================================= */

use crate::defs::{MAX_PLAYERS, MAX_SCORE};

/// Window bound wide enough that `node_score()` (which sums up to
/// `MAX_PLAYERS` per-player scores, each bounded by `MAX_SCORE`) can
/// never reach it, so it's safe to use as +/-infinity for alpha-beta
/// and as the widened window handed to chance-node children.
pub const INF: i32 = MAX_SCORE * MAX_PLAYERS as i32 + 1;

/// Outcome of a recursive search/walk call: whether the branch was
/// legal at all (`success`), and if so, the score seen from the
/// seeking player's viewpoint.
#[derive(Clone, Copy, Debug)]
pub struct SearchOutcome {
    pub success: bool,
    pub score: i32,
}

impl SearchOutcome {
    pub fn failure() -> Self {
        Self {
            success: false,
            score: 0,
        }
    }

    pub fn of(score: i32) -> Self {
        Self {
            success: true,
            score,
        }
    }
}
