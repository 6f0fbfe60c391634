//! Copy-on-rebuild publication for concurrent readers.

use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::error::MaglevError;
use crate::lookup::LookupTable;
use crate::table::Maglev;

/// A [`Maglev`] table shared between one writer at a time and any number of
/// lock-free readers.
///
/// Membership changes are serialized by a mutex and run against the writer's
/// private working table. Only completed tables are stored into the
/// [`ArcSwap`], so readers always see a fully filled snapshot.
pub struct SharedMaglev {
    writer: Mutex<Maglev>,
    current: ArcSwap<LookupTable>,
}

impl SharedMaglev {
    /// Wrap a constructed table.
    pub fn new(table: Maglev) -> Self {
        let current = ArcSwap::new(table.snapshot());
        Self {
            writer: Mutex::new(table),
            current,
        }
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Arc<LookupTable> {
        self.current.load_full()
    }

    /// Backend owning `key` in the latest snapshot.
    pub fn lookup(&self, key: u64) -> String {
        self.current.load().lookup(key).to_owned()
    }

    /// See [`Maglev::add`].
    pub fn add<I, S>(&self, names: I) -> Result<bool, MaglevError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.write(|table| table.add(names))
    }

    /// See [`Maglev::remove`].
    pub fn remove<I, S>(&self, names: I) -> Result<bool, MaglevError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.write(|table| table.remove(names))
    }

    /// See [`Maglev::rebuild`].
    pub fn rebuild<I, S>(&self, dead_names: I) -> Result<bool, MaglevError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.write(|table| table.rebuild(dead_names))
    }

    fn write<F>(&self, f: F) -> Result<bool, MaglevError>
    where
        F: FnOnce(&mut Maglev) -> Result<bool, MaglevError>,
    {
        let mut table = self.writer.lock();
        let changed = f(&mut *table)?;
        if changed {
            self.current.store(table.snapshot());
        }
        Ok(changed)
    }
}

impl std::fmt::Debug for SharedMaglev {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedMaglev")
            .field("modulus", &self.current.load().modulus())
            .finish_non_exhaustive()
    }
}
