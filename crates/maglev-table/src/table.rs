//! The single-writer Maglev table.

use std::collections::BTreeSet;
use std::sync::Arc;

use maglev_hash::{HashParams, Modulus, SMALL_M};
use tracing::{debug, info};

use crate::builder::TableBuilder;
use crate::error::MaglevError;
use crate::fill::WorkingTable;
use crate::lookup::LookupTable;
use crate::options::TableOptions;
use crate::rebuild::RebuildEngine;
use crate::registry::{Backend, NameRegistry};

/// A Maglev assignment table with its registry, hash parameters and cursors.
///
/// All mutation happens on a private working table; once a fill pass
/// completes, a fresh [`LookupTable`] snapshot is published. Readers holding
/// an older snapshot are unaffected.
#[derive(Debug, Clone)]
pub struct Maglev {
    builder: TableBuilder,
    modulus: Modulus,
    registry: NameRegistry,
    params: Vec<HashParams>,
    work: WorkingTable,
    names: Arc<[String]>,
    current: Arc<LookupTable>,
}

impl Maglev {
    /// Build a table of at least `partitions` slots over `names`.
    ///
    /// The table size is the smallest prime `>= partitions`, or the
    /// [`TableOptions::modulus`] override when it is large enough.
    pub fn new<I, S>(names: I, partitions: u64, options: TableOptions) -> Result<Self, MaglevError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if partitions == 0 {
            return Err(MaglevError::ZeroPartitions);
        }
        let modulus = options.modulus_for(partitions);
        Self::with_modulus(names, modulus, options)
    }

    /// Build a table of [`SMALL_M`] slots, for callers that do not pin a size.
    pub fn with_default_size<I, S>(names: I) -> Result<Self, MaglevError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_modulus(names, SMALL_M, TableOptions::default())
    }

    /// Build a table of exactly `modulus` slots.
    pub fn with_modulus<I, S>(
        names: I,
        modulus: Modulus,
        options: TableOptions,
    ) -> Result<Self, MaglevError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rounds = options.rounds();
        let builder = TableBuilder::new(modulus, rounds, options.key());
        let registry = NameRegistry::new(options.key(), names);
        check_size(registry.len(), modulus)?;

        let params = builder.params(&registry);
        let (work, _) = builder.build(&params, registry.dead())?;
        let names: Arc<[String]> = registry.names().map(String::from).collect();
        let current = Arc::new(LookupTable::from_working(names.clone(), &work, modulus));

        info!(
            backends = registry.len(),
            modulus = modulus.get(),
            rounds,
            "built maglev table"
        );

        Ok(Self {
            builder,
            modulus,
            registry,
            params,
            work,
            names,
            current,
        })
    }

    /// Backend owning `key`.
    #[inline]
    pub fn lookup(&self, key: u64) -> &str {
        self.current.lookup(key)
    }

    /// Raw owner of `partition` (`None` when `partition >= M`).
    pub fn partition_owner(&self, partition: usize) -> Option<&str> {
        self.current.partition_owner(partition)
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<LookupTable> {
        Arc::clone(&self.current)
    }

    /// Table size.
    pub fn modulus(&self) -> Modulus {
        self.modulus
    }

    /// Backend names in index order, dead ones included.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Every registered backend with its index and liveness.
    pub fn backends(&self) -> impl ExactSizeIterator<Item = Backend<'_>> {
        self.registry.backends()
    }

    /// Names of dead backends, in index order.
    pub fn dead(&self) -> impl Iterator<Item = &str> {
        self.registry
            .dead()
            .iter()
            .filter_map(|&i| self.registry.name(i))
    }

    /// Permutation steps each backend has consumed, in index order.
    pub fn cursors(&self) -> &[u64] {
        &self.work.cursors
    }

    /// Hash parameters of each backend, in index order.
    pub fn params(&self) -> &[HashParams] {
        &self.params
    }

    /// Register `names`, reviving any that are dead.
    ///
    /// New names change the canonical ordering, so every backend's hash
    /// parameters are re-derived and the table is rebuilt cold. Reviving
    /// dead names also rebuilds cold with the remaining dead set excluded.
    /// Returns `false` when nothing changed.
    pub fn add<I, S>(&mut self, names: I) -> Result<bool, MaglevError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = self.registry.clone();
        let outcome = registry.add(names);
        if outcome.is_noop() {
            debug!("add: all names already live");
            return Ok(false);
        }
        check_size(registry.len(), self.modulus)?;

        let params = if outcome.inserted > 0 {
            self.builder.params(&registry)
        } else {
            self.params.clone()
        };
        let (work, _) = self.builder.build(&params, registry.dead())?;

        if outcome.inserted > 0 {
            self.names = registry.names().map(String::from).collect();
        }
        self.registry = registry;
        self.params = params;
        self.work = work;
        self.publish();

        info!(
            inserted = outcome.inserted,
            revived = outcome.revived,
            backends = self.registry.len(),
            live = self.registry.live_count(),
            "added backends"
        );
        Ok(true)
    }

    /// Mark `names` dead, in addition to the backends already dead.
    ///
    /// Returns `false` when every name was already dead.
    pub fn remove<I, S>(&mut self, names: I) -> Result<bool, MaglevError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dead = self.registry.resolve(names)?;
        dead.extend(self.registry.dead().iter().copied());
        let changed = self.apply_dead(dead)?;
        if changed {
            info!(
                dead = self.registry.dead().len(),
                live = self.registry.live_count(),
                "removed backends"
            );
        }
        Ok(changed)
    }

    /// Replace the dead set with exactly `dead_names`.
    ///
    /// When the new dead set only grows, the table is updated incrementally:
    /// slots of newly dead backends are evicted and refilled by resuming the
    /// live backends' cursors. Any revival forces a cold pass.
    pub fn rebuild<I, S>(&mut self, dead_names: I) -> Result<bool, MaglevError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dead = self.registry.resolve(dead_names)?;
        let changed = self.apply_dead(dead)?;
        if changed {
            info!(
                dead = self.registry.dead().len(),
                live = self.registry.live_count(),
                "rebuilt table"
            );
        }
        Ok(changed)
    }

    fn apply_dead(&mut self, dead: BTreeSet<usize>) -> Result<bool, MaglevError> {
        let delta = self.registry.dead_delta(&dead)?;
        if delta.is_noop() {
            return Ok(false);
        }

        if delta.revived.is_empty() {
            let mut work = self.work.clone();
            RebuildEngine.rebuild(&self.params, &dead, &delta.newly_dead, &mut work)?;
            self.work = work;
        } else {
            let (work, _) = self.builder.build(&self.params, &dead)?;
            self.work = work;
        }

        self.registry.set_dead(dead);
        self.publish();
        Ok(true)
    }

    fn publish(&mut self) {
        self.current = Arc::new(LookupTable::from_working(
            self.names.clone(),
            &self.work,
            self.modulus,
        ));
    }
}

fn check_size(backends: usize, modulus: Modulus) -> Result<(), MaglevError> {
    if backends == 0 {
        return Err(MaglevError::NoBackends);
    }
    // u32::MAX marks an empty slot, so indices must stay below it.
    if backends as u64 > modulus.get() || backends >= u32::MAX as usize {
        return Err(MaglevError::TooManyBackends {
            backends,
            modulus: modulus.get(),
        });
    }
    Ok(())
}
