//! Contact bookkeeping between ticks
//!
//! A conversion should fire once per contact episode, not once per tick the
//! pair stays touching. The tracker remembers last tick's overlapping pairs so
//! only pairs that were apart before count as new.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Unordered agent pair, stored as (smaller id, larger id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey {
    pub lo: u32,
    pub hi: u32,
}

impl PairKey {
    /// `None` for a self-pair
    pub fn new(a: u32, b: u32) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { lo: a, hi: b }),
            std::cmp::Ordering::Greater => Some(Self { lo: b, hi: a }),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.lo, self.hi)
    }
}

/// Pairs that were overlapping at the end of the previous tick
#[derive(Debug, Clone, Default)]
pub struct ContactTracker {
    previous: BTreeSet<PairKey>,
}

impl ContactTracker {
    /// Swap in this tick's overlap set and return the pairs that were not
    /// touching last tick, in ascending key order
    pub fn advance(&mut self, current: BTreeSet<PairKey>) -> Vec<PairKey> {
        let fresh = current.difference(&self.previous).copied().collect();
        self.previous = current;
        fresh
    }

    pub fn contains(&self, key: &PairKey) -> bool {
        self.previous.contains(key)
    }

    pub fn len(&self) -> usize {
        self.previous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PairKey> {
        self.previous.iter()
    }
}
