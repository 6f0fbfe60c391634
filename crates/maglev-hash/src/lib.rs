//! Permutation parameters for Maglev lookup tables.
//!
//! This crate provides:
//! - [`HashKey`] — the fixed seed of the keyed pseudorandom function (SipHash-2-4).
//! - [`Modulus`] — a prime table size, plus [`SMALL_M`] / [`BIG_M`] size hints.
//! - [`HashParams`] — per-backend `(offset, skip)` steps, one per permutation round.
//! - [`Permutation`] — the lazy, infinite candidate-slot sequence of one backend.
//!
//! Everything here is a pure function of `(name, round, key)`. Two processes
//! that agree on the key and the backend names derive identical parameters.

mod key;
mod params;
mod permutation;
mod prime;

pub use key::{DEFAULT_HASH_KEY, HashKey};
pub use params::{HashParams, Step, generate, generate_step};
pub use permutation::Permutation;
pub use prime::{BIG_M, Modulus, SMALL_M, is_prime};
