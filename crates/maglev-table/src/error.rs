//! Error types for table construction and membership changes.

/// Errors that can occur while building or rebuilding a Maglev table.
#[derive(Debug, thiserror::Error)]
pub enum MaglevError {
    /// The table was asked for zero partitions.
    #[error("partition count must be at least 1")]
    ZeroPartitions,

    /// The table was constructed without any backend names.
    #[error("at least one backend is required")]
    NoBackends,

    /// More backends than slots: some backend could never own a partition.
    #[error("{backends} backends do not fit in a table of {modulus} slots")]
    TooManyBackends {
        /// Number of distinct backend names.
        backends: usize,
        /// Table size.
        modulus: u64,
    },

    /// A removal or rebuild named a backend that was never added.
    #[error("unknown backend: {0}")]
    UnknownBackend(String),

    /// Every backend would be dead; the table could never be filled.
    #[error("cannot mark every backend dead")]
    NoLiveBackends,

    /// A backend walked its whole permutation without finding a free slot
    /// while the table still had holes. Indicates broken parameter derivation.
    #[error("fill stalled: backend {backend} probed {probes} slots without a free one")]
    FillStalled {
        /// Index of the backend that stalled.
        backend: usize,
        /// Probes performed before giving up.
        probes: u64,
    },
}
