//! Prime table sizes.
//!
//! Every nonzero skip generates the full cycle of residues modulo a prime, so a
//! prime modulus guarantees each backend's permutation visits every slot.

use std::fmt;

/// Size hint for tables up to a few hundred backends.
pub const SMALL_M: Modulus = Modulus(65_537);

/// Size hint for tables with thousands of backends.
pub const BIG_M: Modulus = Modulus(655_373);

/// A prime table size.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Modulus(u64);

impl Modulus {
    /// Accept `m` only if it is prime.
    pub fn new(m: u64) -> Option<Self> {
        is_prime(m).then_some(Self(m))
    }

    /// The smallest prime `>= n` (and `>= 2`).
    pub fn at_least(n: u64) -> Self {
        let mut m = n.max(2);
        while !is_prime(m) {
            m += 1;
        }
        Self(m)
    }

    /// Return the raw size.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Return the size as a slot count.
    pub const fn slots(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Modulus({})", self.0)
    }
}

/// Deterministic primality test by 6k±1 trial division.
///
/// Table sizes are bounded by memory, so `sqrt(n)` divisions are cheap here.
pub fn is_prime(n: u64) -> bool {
    if n < 4 {
        return n >= 2;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut d = 5u64;
    while d.saturating_mul(d) <= n {
        if n % d == 0 || n % (d + 2) == 0 {
            return false;
        }
        d += 6;
    }
    true
}
