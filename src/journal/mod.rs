/* =======================================================================
Arbiter is a generic adversarial-search engine.
======================================================================= */

//! Undo log of state mutations.
//!
//! Every write the search core or a game driver makes to game state (or
//! to engine-owned scalars such as scores and the current player) goes
//! through this journal, so that returning from an explored branch can
//! restore the state exactly and cheaply, without copying the whole
//! state on every node.

use crate::defs::MAX_PLAYERS;
use crate::hash::{HashAlgorithm, HashCode};
use std::marker::PhantomData;

/// Salt used for [`Journal::write_global`] mutations: these do not
/// belong to a specific offset within a state buffer, so they are
/// salted with a fixed sentinel instead of `dst - base`.
pub const GLOBAL_SALT: HashCode = 0xFFFF_FFFF;

/// Inline storage threshold, mirroring the reference engine's
/// pointer-sized inline union. Writes at or under this many bytes avoid
/// a heap allocation for their undo record.
const INLINE_CAP: usize = 8;

/// Size, in bytes, of the region of the global scalar register file
/// `Engine` reserves for itself (the current-player index plus one
/// score per player). Offsets at or beyond this value are free for a
/// game driver's own globals via `Engine::journal_write_global`.
pub const ENGINE_GLOBALS_RESERVED: usize = 4 + 4 * MAX_PLAYERS;

/// Total size of the global scalar register file backing
/// [`Journal::write_global`]/[`Journal::read_global`].
const GLOBALS_SIZE: usize = ENGINE_GLOBALS_RESERVED + 32;

/// Which storage a journal entry's saved bytes belong to.
#[derive(Clone, Copy)]
enum Target {
    /// A region of the caller-supplied state buffer, at `offset`.
    State,
    /// A region of the journal's own global register file, at `offset`.
    Global,
}

#[derive(Clone)]
enum Saved {
    Inline([u8; INLINE_CAP], u8),
    Heap(Vec<u8>),
}

impl Saved {
    fn capture(bytes: &[u8]) -> Self {
        if bytes.len() <= INLINE_CAP {
            let mut buf = [0u8; INLINE_CAP];
            buf[..bytes.len()].copy_from_slice(bytes);
            Saved::Inline(buf, bytes.len() as u8)
        } else {
            Saved::Heap(bytes.to_vec())
        }
    }

    fn as_slice(&self) -> &[u8] {
        match self {
            Saved::Inline(buf, len) => &buf[..*len as usize],
            Saved::Heap(v) => v,
        }
    }
}

struct JournalEntry {
    target: Target,
    offset: usize,
    saved: Saved,
    hash_before: HashCode,
}

/// The undo log itself, generic over the hash algorithm used to keep the
/// incremental state hash in sync with every write. Besides the
/// caller-supplied state buffer, the journal owns a small global
/// register file of its own (see [`Journal::write_global`]) so that
/// mutations to engine-level scalars (current player, per-player
/// scores) are undone on rollback exactly like state-buffer writes,
/// instead of being replayed against the wrong buffer.
pub struct Journal<H> {
    entries: Vec<JournalEntry>,
    hash: HashCode,
    globals: Vec<u8>,
    _algo: PhantomData<H>,
}

impl<H: HashAlgorithm> Journal<H> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            hash: 0,
            globals: vec![0u8; GLOBALS_SIZE],
            _algo: PhantomData,
        }
    }

    /// Current incremental content hash of all live state.
    pub fn current_hash(&self) -> HashCode {
        self.hash
    }

    /// Number of entries currently on the log; also doubles as the
    /// rollback checkpoint returned to callers that want to unwind to
    /// "now" later.
    pub fn top(&self) -> usize {
        self.entries.len()
    }

    /// Push an undo record capturing the current bytes at `buf[offset..offset+size]`,
    /// without performing any write. Used internally by `write`.
    fn save(&mut self, buf: &[u8], offset: usize, size: usize) {
        let saved = Saved::capture(&buf[offset..offset + size]);
        self.entries.push(JournalEntry {
            target: Target::State,
            offset,
            saved,
            hash_before: self.hash,
        });
    }

    /// Save the current bytes at `buf[offset..offset+src.len()]`, then
    /// overwrite them with `src`, updating the incremental hash by the
    /// XOR identity: `hash ^= hash(old, offset) ^ hash(new, offset)`.
    pub fn write(&mut self, buf: &mut [u8], offset: usize, src: &[u8]) {
        self.save(buf, offset, src.len());
        let region = &mut buf[offset..offset + src.len()];
        self.hash ^= H::hash(region, offset as HashCode) ^ H::hash(src, offset as HashCode);
        region.copy_from_slice(src);
    }

    /// Like [`Journal::write`], but for mutations that are not relative
    /// to a state buffer offset (engine-owned globals such as the
    /// current player or a player's score). `offset` indexes the
    /// journal's own global register file, not the caller's state
    /// buffer, and is salted with [`GLOBAL_SALT`] instead of itself.
    pub fn write_global(&mut self, offset: usize, src: &[u8]) {
        let region = &self.globals[offset..offset + src.len()];
        let saved = Saved::capture(region);
        let old_contribution = H::hash(region, GLOBAL_SALT);
        self.entries.push(JournalEntry {
            target: Target::Global,
            offset,
            saved,
            hash_before: self.hash,
        });
        self.hash ^= old_contribution ^ H::hash(src, GLOBAL_SALT);
        self.globals[offset..offset + src.len()].copy_from_slice(src);
    }

    /// Overwrite a global register without journaling the write. Used
    /// outside search, where mutations are never rolled back and so
    /// need not be undo-logged, but must still keep the register file's
    /// content in sync with whatever the engine reports as current.
    pub fn set_global_raw(&mut self, offset: usize, src: &[u8]) {
        self.globals[offset..offset + src.len()].copy_from_slice(src);
    }

    /// Current bytes of the global register file at `offset..offset+len`.
    pub fn read_global(&self, offset: usize, len: usize) -> &[u8] {
        &self.globals[offset..offset + len]
    }

    /// Restore every entry with index >= `top` to its saved bytes, in
    /// reverse insertion order, and restore the hash to the value it had
    /// immediately before the earliest rolled-back entry. State-buffer
    /// entries are restored into `buf`; global-register entries are
    /// restored into the journal's own register file.
    pub fn rollback(&mut self, buf: &mut [u8], top: usize) {
        while self.entries.len() > top {
            let entry = self.entries.pop().unwrap();
            let saved = entry.saved.as_slice();
            match entry.target {
                Target::State => {
                    buf[entry.offset..entry.offset + saved.len()].copy_from_slice(saved);
                }
                Target::Global => {
                    self.globals[entry.offset..entry.offset + saved.len()].copy_from_slice(saved);
                }
            }
            self.hash = entry.hash_before;
        }
    }

    /// Discard the entire log, accepting all in-memory mutations as
    /// permanent. Called when the engine transitions from search to
    /// play.
    pub fn commit(&mut self) {
        self.entries.clear();
    }
}

impl<H: HashAlgorithm> Default for Journal<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Murmur2Hasher;

    #[test]
    fn write_then_rollback_restores_bytes_and_hash() {
        let mut state = [0u8; 64];
        for (i, b) in state.iter_mut().enumerate() {
            *b = i as u8;
        }
        let original = state;

        let mut journal: Journal<Murmur2Hasher> = Journal::new();
        let h0 = journal.current_hash();

        let top = journal.top();
        journal.write(&mut state, 8, &[0xAA; 16]);
        let _h1 = journal.current_hash();
        journal.write(&mut state, 0, &[0xBB; 4]);
        let _h2 = journal.current_hash();

        journal.rollback(&mut state, top);

        assert_eq!(state, original);
        assert_eq!(journal.current_hash(), h0);
        assert_eq!(journal.top(), top);
    }

    #[test]
    fn rollback_is_reverse_order_when_same_bytes_written_twice() {
        let mut state = [0u8; 4];
        let mut journal: Journal<Murmur2Hasher> = Journal::new();
        let top = journal.top();

        journal.write(&mut state, 0, &[1, 1, 1, 1]);
        journal.write(&mut state, 0, &[2, 2, 2, 2]);

        journal.rollback(&mut state, top);
        assert_eq!(state, [0, 0, 0, 0]);
    }

    #[test]
    fn partial_rollback_leaves_earlier_entries_in_place() {
        let mut state = [0u8; 8];
        let mut journal: Journal<Murmur2Hasher> = Journal::new();

        journal.write(&mut state, 0, &[9]);
        let mid = journal.top();
        journal.write(&mut state, 4, &[7]);

        journal.rollback(&mut state, mid);
        assert_eq!(state[0], 9);
        assert_eq!(state[4], 0);
    }

    #[test]
    fn rollback_restores_globals_without_touching_the_state_buffer() {
        let mut state = [0u8; 4];
        let mut journal: Journal<Murmur2Hasher> = Journal::new();

        journal.write(&mut state, 0, &[9]);
        let top = journal.top();
        journal.write_global(0, &7u32.to_ne_bytes());
        journal.write_global(0, &3u32.to_ne_bytes());

        journal.rollback(&mut state, top);

        assert_eq!(state[0], 9, "a global rollback must not touch the state buffer");
        assert_eq!(journal.read_global(0, 4), &0u32.to_ne_bytes());
    }

    #[test]
    fn commit_clears_log_without_touching_state() {
        let mut state = [0u8; 8];
        let mut journal: Journal<Murmur2Hasher> = Journal::new();
        journal.write(&mut state, 0, &[5]);
        journal.commit();
        assert_eq!(journal.top(), 0);
        assert_eq!(state[0], 5);
    }
}
