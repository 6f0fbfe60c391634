//! Canonical backend ordering and the dead set.
//!
//! Backends are ordered by `(order_hash(name), name)`, so the index of a
//! backend depends only on the set of names, never on insertion order.

use std::collections::BTreeSet;

use maglev_hash::HashKey;

use crate::error::MaglevError;

/// A registered backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backend<'a> {
    /// Backend name.
    pub name: &'a str,
    /// Stable index in `[0, N)` under the current name set.
    pub index: usize,
    /// Whether the backend may receive assignments.
    pub live: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    hash: u64,
    name: String,
}

/// Result of merging names into the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddOutcome {
    /// Names that were not registered before.
    pub inserted: usize,
    /// Dead names that became live again.
    pub revived: usize,
}

impl AddOutcome {
    /// True when neither the name list nor the dead set changed.
    pub fn is_noop(&self) -> bool {
        self.inserted == 0 && self.revived == 0
    }
}

/// Difference between the current dead set and a requested one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeadDelta {
    /// Indices that were live and are now dead.
    pub newly_dead: Vec<usize>,
    /// Indices that were dead and are now live.
    pub revived: Vec<usize>,
}

impl DeadDelta {
    /// True when the dead set is unchanged.
    pub fn is_noop(&self) -> bool {
        self.newly_dead.is_empty() && self.revived.is_empty()
    }
}

/// Deduplicated, deterministically ordered backend names plus the dead set.
///
/// Dead backends keep their name and index; they are only excluded from
/// receiving new assignments.
#[derive(Debug, Clone)]
pub struct NameRegistry {
    key: HashKey,
    entries: Vec<Entry>,
    dead: BTreeSet<usize>,
}

impl NameRegistry {
    /// Create a registry from `names` (duplicates are dropped).
    pub fn new<I, S>(key: HashKey, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self {
            key,
            entries: names
                .into_iter()
                .map(|name| {
                    let name = name.into();
                    Entry {
                        hash: key.order_hash(&name),
                        name,
                    }
                })
                .collect(),
            dead: BTreeSet::new(),
        };
        registry.sort();
        registry
    }

    /// Number of registered backends, dead ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no backend is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of backends allowed to receive assignments.
    pub fn live_count(&self) -> usize {
        self.entries.len() - self.dead.len()
    }

    /// Name at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.name.as_str())
    }

    /// Names in index order.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// All backends in index order.
    pub fn backends(&self) -> impl ExactSizeIterator<Item = Backend<'_>> {
        self.entries.iter().enumerate().map(|(index, e)| Backend {
            name: &e.name,
            index,
            live: !self.dead.contains(&index),
        })
    }

    /// Indices of dead backends, ascending.
    pub fn dead(&self) -> &BTreeSet<usize> {
        &self.dead
    }

    /// Index of `name`, if registered.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        let hash = self.key.order_hash(name);
        self.entries
            .binary_search_by(|e| (e.hash, e.name.as_str()).cmp(&(hash, name)))
            .ok()
    }

    /// Merge `names` into the registry.
    ///
    /// New names are inserted and the whole list is re-sorted; names that are
    /// currently dead are revived. Indices of existing backends may shift, so
    /// callers must re-derive every backend's hash parameters when
    /// [`AddOutcome::inserted`] is nonzero.
    pub fn add<I, S>(&mut self, names: I) -> AddOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut revive = BTreeSet::new();
        let mut fresh = BTreeSet::new();

        for name in names {
            let name = name.as_ref();
            match self.index_of(name) {
                Some(index) if self.dead.contains(&index) => {
                    revive.insert(index);
                }
                Some(_) => {}
                None => {
                    fresh.insert(name.to_owned());
                }
            }
        }

        let outcome = AddOutcome {
            inserted: fresh.len(),
            revived: revive.len(),
        };
        for index in &revive {
            self.dead.remove(index);
        }

        if !fresh.is_empty() {
            let dead_names: Vec<String> = self
                .dead
                .iter()
                .map(|&i| self.entries[i].name.clone())
                .collect();
            let key = self.key;
            self.entries.extend(fresh.into_iter().map(|name| Entry {
                hash: key.order_hash(&name),
                name,
            }));
            self.sort();
            self.dead = dead_names
                .iter()
                .filter_map(|name| self.index_of(name))
                .collect();
        }

        outcome
    }

    /// Resolve names to indices, failing on the first unknown one.
    pub fn resolve<I, S>(&self, names: I) -> Result<BTreeSet<usize>, MaglevError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                self.index_of(name)
                    .ok_or_else(|| MaglevError::UnknownBackend(name.to_owned()))
            })
            .collect()
    }

    /// Compare `dead` against the current dead set without changing anything.
    pub fn dead_delta(&self, dead: &BTreeSet<usize>) -> Result<DeadDelta, MaglevError> {
        if dead.len() >= self.entries.len() {
            return Err(MaglevError::NoLiveBackends);
        }
        Ok(DeadDelta {
            newly_dead: dead.difference(&self.dead).copied().collect(),
            revived: self.dead.difference(dead).copied().collect(),
        })
    }

    /// Replace the dead set. Validated by [`dead_delta`](Self::dead_delta) first.
    pub fn set_dead(&mut self, dead: BTreeSet<usize>) {
        self.dead = dead;
    }

    /// Sort by `(hash, name)` and drop duplicate names (which sort adjacent).
    fn sort(&mut self) {
        self.entries
            .sort_by(|a, b| (a.hash, a.name.as_str()).cmp(&(b.hash, b.name.as_str())));
        self.entries.dedup_by(|a, b| a.name == b.name);
    }
}
