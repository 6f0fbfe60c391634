//! Lazy permutation sequences.

use crate::params::HashParams;

/// The infinite cyclic sequence of candidate slots for one backend.
///
/// Each step is O(1) and nothing is materialized, so a table of `N` backends
/// needs `O(N)` memory for permutations instead of `O(N * M)`.
#[derive(Debug, Clone)]
pub struct Permutation<'a> {
    params: &'a HashParams,
    cursor: u64,
}

impl<'a> Permutation<'a> {
    pub(crate) fn new(params: &'a HashParams, cursor: u64) -> Self {
        Self { params, cursor }
    }

    /// Number of steps consumed so far.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// The slot the next call to `next` will yield, without consuming it.
    pub fn peek(&self) -> usize {
        self.params.candidate(self.cursor)
    }
}

impl Iterator for Permutation<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let slot = self.params.candidate(self.cursor);
        self.cursor += 1;
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
