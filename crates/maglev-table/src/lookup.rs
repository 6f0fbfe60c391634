//! Immutable, query-ready assignment tables.

use std::sync::Arc;

use maglev_hash::Modulus;

use crate::fill::{EMPTY, WorkingTable};

/// A completed `partition -> backend` table.
///
/// Snapshots are only ever built from a full working table, so every
/// partition holds a live backend and [`lookup`](Self::lookup) cannot fail.
/// Cloning is cheap: names and assignments are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTable {
    names: Arc<[String]>,
    assignments: Arc<[u32]>,
    modulus: Modulus,
}

impl LookupTable {
    pub(crate) fn from_working(
        names: Arc<[String]>,
        table: &WorkingTable,
        modulus: Modulus,
    ) -> Self {
        debug_assert!(table.is_full());
        debug_assert!(!table.slots.contains(&EMPTY));
        Self {
            names,
            assignments: table.slots.as_slice().into(),
            modulus,
        }
    }

    /// Backend owning `key`: `assignments[key mod M]`.
    #[inline]
    pub fn lookup(&self, key: u64) -> &str {
        let partition = (key % self.modulus.get()) as usize;
        &self.names[self.assignments[partition] as usize]
    }

    /// Index of the backend owning `key`.
    #[inline]
    pub fn lookup_index(&self, key: u64) -> usize {
        self.assignments[(key % self.modulus.get()) as usize] as usize
    }

    /// Raw owner of `partition`, without reducing modulo `M`.
    ///
    /// Returns `None` for `partition >= M`.
    pub fn partition_owner(&self, partition: usize) -> Option<&str> {
        self.assignments
            .get(partition)
            .map(|&i| self.names[i as usize].as_str())
    }

    /// Backend index per partition.
    pub fn assignments(&self) -> &[u32] {
        &self.assignments
    }

    /// Backend names in index order, dead ones included.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Table size.
    pub fn modulus(&self) -> Modulus {
        self.modulus
    }

    /// Number of partitions (equal to the modulus).
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Always false for a constructed table; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
