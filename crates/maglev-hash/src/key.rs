//! Keyed 64-bit digests of backend names.

use std::fmt;
use std::hash::Hasher;

use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher24;

/// Seed used when the caller does not supply one.
pub const DEFAULT_HASH_KEY: u64 = 0xdead_beef_cafe_babe;

/// Seed for the keyed pseudorandom function applied to backend names.
///
/// Passed by value into every hashing call; there is no global hashing state.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashKey(u64);

impl HashKey {
    /// Wrap a raw 64-bit seed.
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Return the raw seed.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// SipHash-2-4 of the name's UTF-8 bytes, keyed with `(seed, round)`.
    ///
    /// Different rounds use different SipHash keys, so the digests for
    /// `(name, 0)` and `(name, 1)` are independent.
    pub fn digest(self, name: &str, round: u32) -> u64 {
        let mut hasher = SipHasher24::new_with_keys(self.0, u64::from(round));
        hasher.write(name.as_bytes());
        hasher.finish()
    }

    /// The hash that orders backends in the registry (the round-0 digest).
    pub fn order_hash(self, name: &str) -> u64 {
        self.digest(name, 0)
    }
}

impl Default for HashKey {
    fn default() -> Self {
        Self(DEFAULT_HASH_KEY)
    }
}

impl From<u64> for HashKey {
    fn from(seed: u64) -> Self {
        Self(seed)
    }
}

impl fmt::Debug for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashKey({:#018x})", self.0)
    }
}
