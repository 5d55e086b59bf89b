//! The optional, append-only match-event log.

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::cache::order::{OrderId, SecurityId};

/// One successful pairing: the buy order's id first, regardless of which of
/// the two matched orders triggered the match, the sell order's id second,
/// and the quantity traded between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub buy_id: OrderId,
    pub sell_id: OrderId,
    pub qty: u64,
}

/// An append-only log of match events, pre-sharded per security so that
/// [`crate::MatchCache::get_order_matches_by_security`] is a single shard
/// read rather than a scan of every match ever recorded.
#[derive(Default)]
pub(crate) struct MatchLog {
    shards: DashMap<SecurityId, Mutex<Vec<MatchRecord>>>,
}

impl MatchLog {
    pub(crate) fn new() -> Self {
        MatchLog::default()
    }

    pub(crate) fn append(&self, security: &SecurityId, record: MatchRecord) {
        self.shards
            .entry(security.clone())
            .or_default()
            .lock()
            .push(record);
    }

    /// Snapshot copy of every record logged for `security`, in arrival
    /// order. Empty (not missing) if the security has never matched.
    pub(crate) fn for_security(&self, security: &SecurityId) -> Vec<MatchRecord> {
        self.shards
            .get(security)
            .map(|shard| shard.lock().clone())
            .unwrap_or_default()
    }
}
