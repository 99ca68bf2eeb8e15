/* =======================================================================
Arbiter is a generic adversarial-search engine.
======================================================================= */

use crate::defs::About;
use clap::{Arg, ArgAction, Command};

/// Names the flags `CmdLine` parses, so a typo in an `ArgMatches` key
/// is a compile error in exactly one place.
struct CmdLineArgs;
impl CmdLineArgs {
    const QUIET: &'static str = "quiet";
    const FULL_SEARCH: &'static str = "full_search";
    const DEPTH: &'static str = "depth";
    const HASH: &'static str = "hash";
    const RANDOM_SEED: &'static str = "random_seed";
    const WALK: &'static str = "walk";
    const PRELIM_INC: &'static str = "prelim_inc";
    const PLAYERS: &'static str = "players";
    const INTERACTIVE: &'static str = "interactive";
}

/// Thin wrapper over `clap::ArgMatches`, handed to a game's `main` so it
/// doesn't need to know clap's API directly.
pub struct CmdLine {
    matches: clap::ArgMatches,
}

impl CmdLine {
    pub fn new() -> Self {
        let matches = Command::new(About::ENGINE)
            .version(About::VERSION)
            .author(About::AUTHOR)
            .about("Generic alpha-beta adversarial-search engine")
            .arg(
                Arg::new(CmdLineArgs::QUIET)
                    .short('q')
                    .long("quiet")
                    .action(ArgAction::SetTrue)
                    .help("Suppress search-progress reports"),
            )
            .arg(
                Arg::new(CmdLineArgs::FULL_SEARCH)
                    .short('F')
                    .long("full-search")
                    .action(ArgAction::SetTrue)
                    .help("Disable the preliminary-search increment"),
            )
            .arg(
                Arg::new(CmdLineArgs::DEPTH)
                    .short('d')
                    .long("depth")
                    .value_name("N")
                    .help("Maximum search depth in plies"),
            )
            .arg(
                Arg::new(CmdLineArgs::HASH)
                    .short('H')
                    .long("hash")
                    .value_name("ORDER")
                    .help("Transposition table size as 2^ORDER - 1 entries per player"),
            )
            .arg(
                Arg::new(CmdLineArgs::RANDOM_SEED)
                    .short('r')
                    .long("seed")
                    .value_name("N")
                    .help("Seed for the random-playout generator"),
            )
            .arg(
                Arg::new(CmdLineArgs::WALK)
                    .short('w')
                    .long("walk")
                    .value_name("N")
                    .help("Random-playout depth past the search horizon (-1 = unlimited)"),
            )
            .arg(
                Arg::new(CmdLineArgs::PRELIM_INC)
                    .short('i')
                    .long("prelim-inc")
                    .value_name("N")
                    .help("Preliminary search increment in plies"),
            )
            .arg(
                Arg::new(CmdLineArgs::PLAYERS)
                    .short('p')
                    .long("players")
                    .value_name("N")
                    .help("Number of players"),
            )
            .arg(
                Arg::new(CmdLineArgs::INTERACTIVE)
                    .long("interactive")
                    .value_name("PLAYER")
                    .help("Route this player's moves through stdin instead of the search"),
            )
            .get_matches();

        Self { matches }
    }

    pub fn quiet(&self) -> bool {
        self.matches.get_flag(CmdLineArgs::QUIET)
    }

    pub fn full_search(&self) -> bool {
        self.matches.get_flag(CmdLineArgs::FULL_SEARCH)
    }

    pub fn depth(&self) -> Option<i8> {
        self.matches
            .get_one::<String>(CmdLineArgs::DEPTH)
            .and_then(|s| s.parse().ok())
    }

    pub fn hash_order(&self) -> Option<u32> {
        self.matches
            .get_one::<String>(CmdLineArgs::HASH)
            .and_then(|s| s.parse().ok())
    }

    pub fn random_seed(&self) -> Option<u64> {
        self.matches
            .get_one::<String>(CmdLineArgs::RANDOM_SEED)
            .and_then(|s| s.parse().ok())
    }

    pub fn walk(&self) -> Option<i8> {
        self.matches
            .get_one::<String>(CmdLineArgs::WALK)
            .and_then(|s| s.parse().ok())
    }

    pub fn prelim_inc(&self) -> Option<i8> {
        self.matches
            .get_one::<String>(CmdLineArgs::PRELIM_INC)
            .and_then(|s| s.parse().ok())
    }

    pub fn players(&self) -> Option<usize> {
        self.matches
            .get_one::<String>(CmdLineArgs::PLAYERS)
            .and_then(|s| s.parse().ok())
    }

    pub fn interactive_player(&self) -> Option<usize> {
        self.matches
            .get_one::<String>(CmdLineArgs::INTERACTIVE)
            .and_then(|s| s.parse().ok())
    }
}

impl Default for CmdLine {
    fn default() -> Self {
        Self::new()
    }
}
