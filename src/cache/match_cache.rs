//! Per-security matched-lot counters.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::cache::order::SecurityId;

/// A per-security running total of matched lots.
///
/// Realized as `DashMap<SecurityId, AtomicU64>` rather than a single
/// `RwLock<HashMap<_, _>>`: the read-modify-write named in the
/// specification's lock hierarchy ("match-cache lock: short critical
/// section around read-modify-write of one counter") is a single
/// `fetch_add`, which needs no lock at all and can never be left stuck.
#[derive(Default)]
pub(crate) struct MatchCacheTable {
    totals: DashMap<SecurityId, AtomicU64>,
}

impl MatchCacheTable {
    pub(crate) fn new() -> Self {
        MatchCacheTable::default()
    }

    /// Adds `lots` to the running total for `security`. A zero add is a
    /// pure no-op and does not mark the security as seen — `contains`
    /// stays `false` until a real match lands.
    pub(crate) fn add(&self, security: &SecurityId, lots: u64) {
        if lots == 0 {
            return;
        }
        self.totals
            .entry(security.clone())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(lots, Ordering::AcqRel);
    }

    /// Returns the current total for `security`, defaulting to zero if the
    /// security has never had a match recorded.
    pub(crate) fn get(&self, security: &SecurityId) -> u64 {
        self.totals
            .get(security)
            .map(|entry| entry.load(Ordering::Acquire))
            .unwrap_or(0)
    }

    pub(crate) fn contains(&self, security: &SecurityId) -> bool {
        self.totals.contains_key(security)
    }
}
