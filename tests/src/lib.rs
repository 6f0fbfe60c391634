//! Shared helpers for Maglev integration tests.

use std::collections::BTreeSet;

use maglev_table::{LookupTable, Maglev, TableOptions};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `backend-0` .. `backend-{n-1}`.
pub fn backend_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("backend-{i}")).collect()
}

/// A table over `backend_names(n)` with default options.
pub fn table(n: usize, partitions: u64) -> Maglev {
    Maglev::new(backend_names(n), partitions, TableOptions::default())
        .expect("valid test table")
}

/// Reproducible pseudo-random keys.
pub fn random_keys(seed: u64, count: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.random()).collect()
}

/// Owner name of every partition.
pub fn owners(snap: &LookupTable) -> Vec<String> {
    snap.assignments()
        .iter()
        .map(|&i| snap.names()[i as usize].clone())
        .collect()
}

/// Distinct backends that own at least one partition.
pub fn owner_set(snap: &LookupTable) -> BTreeSet<String> {
    owners(snap).into_iter().collect()
}

/// Fraction of `keys` whose owner differs between two snapshots.
pub fn key_disruption(before: &LookupTable, after: &LookupTable, keys: &[u64]) -> f64 {
    let moved = keys
        .iter()
        .filter(|&&k| before.lookup(k) != after.lookup(k))
        .count();
    moved as f64 / keys.len() as f64
}
