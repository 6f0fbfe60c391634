//! Incremental rebuilds: evict newly dead backends, then refill.

use std::collections::BTreeSet;

use maglev_hash::HashParams;
use tracing::debug;

use crate::error::MaglevError;
use crate::fill::{EMPTY, FillStats, WorkingTable, sweep};

/// Updates a completed table in place when backends die.
///
/// Slots owned by live backends are never touched, and live cursors resume
/// where the previous pass left them, so only the vacated slots change owner.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RebuildEngine;

impl RebuildEngine {
    /// Clear every slot owned by a backend in `newly_dead`.
    ///
    /// Returns the number of evicted slots.
    pub(crate) fn evict(&self, table: &mut WorkingTable, newly_dead: &[usize]) -> usize {
        if newly_dead.is_empty() {
            return 0;
        }
        let mut owned_by_dead = vec![false; table.cursors.len()];
        for &i in newly_dead {
            owned_by_dead[i] = true;
        }

        let mut evicted = 0;
        for slot in table.slots.iter_mut() {
            if *slot != EMPTY && owned_by_dead[*slot as usize] {
                *slot = EMPTY;
                evicted += 1;
            }
        }
        table.filled -= evicted;
        evicted
    }

    /// Evict `newly_dead` and refill the holes from the live backends.
    ///
    /// `dead` is the complete dead set after the change (a superset of
    /// `newly_dead`).
    pub(crate) fn rebuild(
        &self,
        params: &[HashParams],
        dead: &BTreeSet<usize>,
        newly_dead: &[usize],
        table: &mut WorkingTable,
    ) -> Result<FillStats, MaglevError> {
        debug_assert!(newly_dead.iter().all(|i| dead.contains(i)));

        let evicted = self.evict(table, newly_dead);
        let stats = sweep(params, dead, table)?;
        debug!(
            kind = "incremental",
            modulus = table.slots.len(),
            backends = params.len(),
            dead = dead.len(),
            evicted,
            claims = stats.claims,
            collisions = stats.collisions,
            "filled assignment table"
        );
        Ok(stats)
    }
}
