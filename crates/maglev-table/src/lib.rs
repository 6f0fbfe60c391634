//! Maglev consistent hashing.
//!
//! This crate builds and maintains the Maglev assignment table: a prime-sized
//! array mapping every partition to one backend, such that lookups are O(1),
//! load is near-uniform and membership changes move close to the minimum
//! fraction of keys.
//!
//! - [`Maglev`] — the single-writer table: construction, `add`, `remove`,
//!   `rebuild`, `lookup`.
//! - [`SharedMaglev`] — publishes completed snapshots to concurrent readers.
//! - [`LookupTable`] — an immutable snapshot, plus disruption and load audits.
//! - [`NameRegistry`] — deterministic backend ordering and the dead set.
//! - [`TableBuilder`] — hash parameter derivation and cold fill passes.
//!
//! Permutation parameters come from the [`maglev_hash`] crate.

mod audit;
mod builder;
mod error;
mod fill;
mod lookup;
mod options;
mod rebuild;
mod registry;
mod shared;
mod table;


pub use audit::{LoadStats, Reassignment};
pub use builder::TableBuilder;
pub use error::MaglevError;
pub use lookup::LookupTable;
pub use maglev_hash::{BIG_M, HashKey, Modulus, SMALL_M};
pub use options::TableOptions;
pub use registry::{AddOutcome, Backend, DeadDelta, NameRegistry};
pub use shared::SharedMaglev;
pub use table::Maglev;
