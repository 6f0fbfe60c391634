//! Cold construction of an assignment table.

use std::collections::BTreeSet;

use maglev_hash::{HashKey, HashParams, Modulus, generate};
use tracing::debug;

use crate::error::MaglevError;
use crate::fill::{FillStats, WorkingTable, sweep};
use crate::registry::NameRegistry;

/// Builds a table from scratch: every slot empty, every cursor at 0.
#[derive(Debug, Clone, Copy)]
pub struct TableBuilder {
    modulus: Modulus,
    rounds: u32,
    key: HashKey,
}

impl TableBuilder {
    /// A builder for tables of `modulus` slots.
    pub fn new(modulus: Modulus, rounds: u32, key: HashKey) -> Self {
        Self {
            modulus,
            rounds: rounds.max(1),
            key,
        }
    }

    /// Derive the hash parameters of every registered backend, in index order.
    pub fn params(&self, registry: &NameRegistry) -> Vec<HashParams> {
        registry
            .names()
            .map(|name| generate(name, self.modulus, self.rounds, self.key))
            .collect()
    }

    /// Fill a fresh table, skipping the `dead` backends.
    pub(crate) fn build(
        &self,
        params: &[HashParams],
        dead: &BTreeSet<usize>,
    ) -> Result<(WorkingTable, FillStats), MaglevError> {
        let mut table = WorkingTable::new(self.modulus.slots(), params.len());
        let stats = sweep(params, dead, &mut table)?;
        debug!(
            kind = "cold",
            modulus = self.modulus.get(),
            backends = params.len(),
            dead = dead.len(),
            claims = stats.claims,
            collisions = stats.collisions,
            "filled assignment table"
        );
        Ok((table, stats))
    }
}
