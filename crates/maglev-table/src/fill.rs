//! The greedy round-robin fill shared by cold builds and incremental rebuilds.

use std::collections::BTreeSet;

use maglev_hash::HashParams;

use crate::error::MaglevError;

/// Marker for a slot no backend owns yet.
pub(crate) const EMPTY: u32 = u32::MAX;

/// A private, possibly partially filled assignment table plus the per-backend
/// cursors that produced it. Never exposed to readers.
#[derive(Debug, Clone)]
pub(crate) struct WorkingTable {
    /// `slots[p]` is a backend index or [`EMPTY`].
    pub(crate) slots: Vec<u32>,
    /// Number of non-empty slots.
    pub(crate) filled: usize,
    /// Permutation steps consumed per backend.
    pub(crate) cursors: Vec<u64>,
}

impl WorkingTable {
    /// An empty table with every cursor at 0.
    pub(crate) fn new(slots: usize, backends: usize) -> Self {
        Self {
            slots: vec![EMPTY; slots],
            filled: 0,
            cursors: vec![0; backends],
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.filled == self.slots.len()
    }
}

/// Counters for one fill pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillStats {
    /// Slots claimed during the pass.
    pub claims: usize,
    /// Candidate slots that were already taken.
    pub collisions: u64,
}

/// Sweep live backends in index order, one claim per backend per sweep, until
/// the table is full.
///
/// Each backend resumes from its cursor: it probes candidates until it lands
/// on a free slot, claims it and advances past it. Dead backends are skipped
/// entirely and their cursors do not move.
pub(crate) fn sweep(
    params: &[HashParams],
    dead: &BTreeSet<usize>,
    table: &mut WorkingTable,
) -> Result<FillStats, MaglevError> {
    let mut stats = FillStats::default();
    let m = table.slots.len();
    if table.is_full() {
        return Ok(stats);
    }

    let live: Vec<usize> = (0..params.len()).filter(|i| !dead.contains(i)).collect();
    if live.is_empty() {
        return Err(MaglevError::NoLiveBackends);
    }

    loop {
        for &i in &live {
            let backend = &params[i];
            let cursor = &mut table.cursors[i];
            let mut probes = 0u64;

            let slot = loop {
                let c = backend.candidate(*cursor);
                *cursor += 1;
                if table.slots[c] == EMPTY {
                    break c;
                }
                probes += 1;
                // A full period without a free slot means the table is full
                // or the permutation is not a permutation.
                if probes >= m as u64 {
                    return Err(MaglevError::FillStalled { backend: i, probes });
                }
            };

            table.slots[slot] = i as u32;
            table.filled += 1;
            stats.claims += 1;
            stats.collisions += probes;

            if table.is_full() {
                return Ok(stats);
            }
        }
    }
}
