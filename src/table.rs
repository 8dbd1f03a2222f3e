//! Weighted random selection table
//!
//! A [`WeightTable`] maps unique string keys to a payload and a positive
//! integer weight. [`WeightTable::get`] draws one entry with probability
//! `weight / total_weight`.
//!
//! The table never evicts entries. Memory grows with every distinct key
//! until the caller deletes it or tears the table down.

use crate::error::AddError;
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A stored entry: its weight and payload
#[derive(Debug, Clone)]
struct Item<V> {
    weight: i64,
    value: V,
}

#[derive(Debug)]
struct Inner<V> {
    items: HashMap<String, Item<V>>,
    // Always equals the sum of `items[*].weight`
    total_weight: i64,
}

/// Concurrent weighted random selection table
///
/// One reader/writer lock guards the whole table. Mutations (`add`,
/// `delete`, `clear`) take it exclusively so the entry and the running total
/// change together; draws and probability queries share it.
///
/// Values handed back to callers are clones, never references into the
/// table's storage.
#[derive(Debug)]
pub struct WeightTable<V> {
    inner: RwLock<Inner<V>>,
}

impl<V> Default for WeightTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> WeightTable<V> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                items: HashMap::new(),
                total_weight: 0,
            }),
        }
    }

    /// Create an empty shared table together with its teardown guard
    ///
    /// The guard clears the table when [`Teardown::run`] is called or when
    /// it goes out of scope, whichever happens first.
    ///
    /// ```
    /// use weighttable::WeightTable;
    ///
    /// let (table, teardown) = WeightTable::scoped();
    /// table.add("primary", Some("10.0.0.1"), 10);
    /// teardown.run();
    /// assert!(table.is_empty());
    /// ```
    pub fn scoped() -> (Arc<Self>, Teardown<V>) {
        let table = Arc::new(Self::new());
        let teardown = Teardown {
            table: Some(Arc::clone(&table)),
        };
        (table, teardown)
    }

    // A poisoned lock means a panic happened while a guard was held. Every
    // critical section validates before it mutates, so the data is intact.
    fn read(&self) -> RwLockReadGuard<'_, Inner<V>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner<V>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Add weight (and optionally a value) under `key`
    ///
    /// Returns `false` without touching the table when the key is empty,
    /// the weight is not positive, a new key comes without a value, or the
    /// total weight would overflow. See [`WeightTable::try_add`] for the
    /// reason behind a rejection.
    pub fn add(&self, key: &str, value: Option<V>, weight: i64) -> bool {
        self.try_add(key, value, weight).is_ok()
    }

    /// Add weight (and optionally a value) under `key`, reporting why a
    /// rejected add failed
    ///
    /// - New key: inserted with `weight` and `value`; `value` is required.
    /// - Existing key: `weight` is added to the stored weight. `Some(value)`
    ///   replaces the stored payload, `None` keeps it.
    pub fn try_add(&self, key: &str, value: Option<V>, weight: i64) -> Result<(), AddError> {
        if key.is_empty() {
            return Err(AddError::EmptyKey);
        }
        if weight <= 0 {
            return Err(AddError::NonPositiveWeight(weight));
        }

        let mut guard = self.write();
        let inner = &mut *guard;

        let Some(new_total) = inner.total_weight.checked_add(weight) else {
            tracing::warn!(
                key = %key,
                weight = weight,
                total_weight = inner.total_weight,
                "Rejected add: total weight would overflow"
            );
            return Err(AddError::WeightOverflow {
                key: key.to_string(),
                weight,
            });
        };

        // Entry weights never exceed the total, so the entry update cannot
        // overflow once the total update succeeded.
        match inner.items.get_mut(key) {
            Some(item) => {
                item.weight += weight;
                let replaced = match value {
                    Some(value) => {
                        item.value = value;
                        true
                    }
                    None => false,
                };
                tracing::debug!(
                    key = %key,
                    added_weight = weight,
                    entry_weight = item.weight,
                    value_replaced = replaced,
                    "Accumulated weight on existing entry"
                );
            }
            None => {
                let Some(value) = value else {
                    return Err(AddError::MissingValue(key.to_string()));
                };
                inner.items.insert(key.to_string(), Item { weight, value });
                tracing::debug!(key = %key, weight = weight, "Inserted new entry");
            }
        }
        inner.total_weight = new_total;

        Ok(())
    }

    /// Remove `key` and its weight contribution. Absent keys are ignored.
    pub fn delete(&self, key: &str) {
        let mut inner = self.write();
        if let Some(item) = inner.items.remove(key) {
            inner.total_weight -= item.weight;
            tracing::debug!(
                key = %key,
                weight = item.weight,
                total_weight = inner.total_weight,
                "Deleted entry"
            );
        }
    }

    /// Remove every entry and reset the total weight to zero
    pub fn clear(&self) {
        let mut inner = self.write();
        let removed = inner.items.len();
        inner.items.clear();
        inner.total_weight = 0;
        tracing::debug!(removed_entries = removed, "Cleared weight table");
    }

    /// Percentage chance of drawing `key`, rounded to the nearest hundredth
    ///
    /// Returns `0.0` both for an empty table and for an absent key.
    pub fn get_probability(&self, key: &str) -> f64 {
        let inner = self.read();
        if inner.total_weight == 0 {
            return 0.0;
        }
        inner
            .items
            .get(key)
            .map(|item| percentage(item.weight, inner.total_weight))
            .unwrap_or(0.0)
    }

    /// Percentage chance of drawing each key, rounded to the nearest hundredth
    ///
    /// Each entry is rounded on its own, so the values may not sum to
    /// exactly 100.
    pub fn get_all_probabilities(&self) -> HashMap<String, f64> {
        let inner = self.read();
        if inner.total_weight == 0 {
            return HashMap::new();
        }
        inner
            .items
            .iter()
            .map(|(key, item)| (key.clone(), percentage(item.weight, inner.total_weight)))
            .collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().items.is_empty()
    }

    /// Sum of all entry weights
    pub fn total_weight(&self) -> i64 {
        self.read().total_weight
    }

    /// Current weight stored under `key`
    pub fn weight(&self, key: &str) -> Option<i64> {
        self.read().items.get(key).map(|item| item.weight)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.read().items.contains_key(key)
    }

    /// Snapshot of the stored keys, in no particular order
    pub fn keys(&self) -> Vec<String> {
        self.read().items.keys().cloned().collect()
    }
}

impl<V: Clone> WeightTable<V> {
    /// Draw one entry at random, weighted by entry weight
    ///
    /// Returns `None` when the table holds no weight.
    pub fn get(&self) -> Option<(String, V)> {
        self.get_with(&mut rand::rng())
    }

    /// Draw one entry using the supplied random number generator
    ///
    /// Picks `r` uniformly in `[1, total_weight]` and walks the entries,
    /// subtracting each weight until `r` reaches zero. Iteration order is
    /// arbitrary; every unit of weight is equally likely to be hit.
    pub fn get_with<R: Rng>(&self, rng: &mut R) -> Option<(String, V)> {
        let inner = self.read();
        if inner.total_weight <= 0 {
            return None;
        }

        let mut remaining = rng.random_range(1..=inner.total_weight);
        for (key, item) in &inner.items {
            remaining -= item.weight;
            if remaining <= 0 {
                tracing::trace!(
                    key = %key,
                    entry_weight = item.weight,
                    total_weight = inner.total_weight,
                    "Drew entry"
                );
                return Some((key.clone(), item.value.clone()));
            }
        }

        // Unreachable while the total matches the entry weights
        tracing::error!(
            total_weight = inner.total_weight,
            entries = inner.items.len(),
            "Total weight exceeds the sum of entry weights; no entry drawn"
        );
        None
    }
}

/// `weight / total` as a percentage, rounded half away from zero to two
/// decimal places
fn percentage(weight: i64, total: i64) -> f64 {
    let pct = weight as f64 / total as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Clears a [`WeightTable`] when run or dropped
///
/// Returned by [`WeightTable::scoped`]. Holding the guard keeps the table
/// alive; running it releases that hold.
#[derive(Debug)]
#[must_use = "dropping the teardown guard clears the table immediately"]
pub struct Teardown<V> {
    table: Option<Arc<WeightTable<V>>>,
}

impl<V> Teardown<V> {
    /// Clear the table now
    pub fn run(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(table) = self.table.take() {
            table.clear();
        }
    }
}

impl<V> Drop for Teardown<V> {
    fn drop(&mut self) {
        self.release();
    }
}
