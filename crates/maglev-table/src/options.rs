//! Table construction options.

use maglev_hash::{DEFAULT_HASH_KEY, HashKey, Modulus};
use serde::Deserialize;
use tracing::warn;

/// Options accepted by [`Maglev::new`](crate::Maglev::new).
///
/// Deserializable so callers can embed a `[table]` section in their own TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Number of `(offset, skip)` rounds per backend. Values below 1 are clamped to 1.
    pub permutation_rounds: u32,
    /// Explicit table size. Replaced by the smallest prime `>= partitions`
    /// when smaller than the partition count, or by the next prime when composite.
    pub modulus: Option<u64>,
    /// Seed of the keyed hash applied to backend names.
    pub hash_key: u64,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            permutation_rounds: 1,
            modulus: None,
            hash_key: DEFAULT_HASH_KEY,
        }
    }
}

impl TableOptions {
    /// Set the number of permutation rounds.
    pub fn with_permutation_rounds(mut self, rounds: u32) -> Self {
        self.permutation_rounds = rounds;
        self
    }

    /// Pin the table size.
    pub fn with_modulus(mut self, modulus: u64) -> Self {
        self.modulus = Some(modulus);
        self
    }

    /// Set the hash seed.
    pub fn with_hash_key(mut self, key: u64) -> Self {
        self.hash_key = key;
        self
    }

    /// Effective round count (at least 1).
    pub fn rounds(&self) -> u32 {
        if self.permutation_rounds < 1 {
            warn!(
                requested = self.permutation_rounds,
                "permutation rounds clamped to 1"
            );
            1
        } else {
            self.permutation_rounds
        }
    }

    /// Effective hash key.
    pub fn key(&self) -> HashKey {
        HashKey::new(self.hash_key)
    }

    /// Choose the prime table size for `partitions` requested slots.
    pub fn modulus_for(&self, partitions: u64) -> Modulus {
        match self.modulus {
            Some(m) if m < partitions => {
                let chosen = Modulus::at_least(partitions);
                warn!(
                    requested = m,
                    partitions,
                    %chosen,
                    "modulus override smaller than partition count"
                );
                chosen
            }
            Some(m) => {
                let chosen = Modulus::at_least(m);
                if chosen.get() != m {
                    warn!(requested = m, %chosen, "modulus override is not prime");
                }
                chosen
            }
            None => Modulus::at_least(partitions),
        }
    }
}
