//! Disruption and load accounting between table snapshots.

use crate::lookup::LookupTable;

/// A partition whose owner differs between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    /// The partition that changed hands.
    pub partition: usize,
    /// Owner in the old snapshot.
    pub from: String,
    /// Owner in the new snapshot.
    pub to: String,
}

impl LookupTable {
    /// Partitions whose owner changed from `old` to `new`.
    ///
    /// Owners are compared by name, so snapshots taken before and after an
    /// `add` (which may renumber backends) compare correctly. Only the
    /// partitions both tables have are compared.
    pub fn diff(old: &LookupTable, new: &LookupTable) -> Vec<Reassignment> {
        let shared = old.len().min(new.len());
        (0..shared)
            .filter_map(|p| {
                let from = old.partition_owner(p)?;
                let to = new.partition_owner(p)?;
                (from != to).then(|| Reassignment {
                    partition: p,
                    from: from.to_owned(),
                    to: to.to_owned(),
                })
            })
            .collect()
    }

    /// Fraction of shared partitions whose owner changed.
    pub fn disruption(old: &LookupTable, new: &LookupTable) -> f64 {
        let shared = old.len().min(new.len());
        if shared == 0 {
            return 0.0;
        }
        let moved = (0..shared)
            .filter(|&p| old.partition_owner(p) != new.partition_owner(p))
            .count();
        moved as f64 / shared as f64
    }

    /// Slots owned per backend.
    pub fn load(&self) -> LoadStats {
        let mut counts = vec![0usize; self.names().len()];
        for &i in self.assignments() {
            counts[i as usize] += 1;
        }
        LoadStats { counts }
    }
}

/// Per-backend slot counts of one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadStats {
    /// `counts[i]` is the number of partitions owned by backend `i`.
    /// Dead backends own zero.
    pub counts: Vec<usize>,
}

impl LoadStats {
    /// Number of backends owning at least one partition.
    pub fn owners(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Largest per-backend count.
    pub fn max(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Smallest count among backends that own anything.
    pub fn min(&self) -> usize {
        self.counts
            .iter()
            .copied()
            .filter(|&c| c > 0)
            .min()
            .unwrap_or(0)
    }

    /// Mean count over backends that own anything.
    pub fn mean(&self) -> f64 {
        let owners = self.owners();
        if owners == 0 {
            return 0.0;
        }
        self.counts.iter().sum::<usize>() as f64 / owners as f64
    }

    /// `max / mean`; 1.0 is a perfectly even table.
    pub fn peak_to_mean(&self) -> f64 {
        let mean = self.mean();
        if mean == 0.0 {
            return 0.0;
        }
        self.max() as f64 / mean
    }
}
