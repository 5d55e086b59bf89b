//! The four-way index set, guarded by a single global reader-writer lock.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::cache::order::{Order, OrderId, SecurityId, Side, UserId};

/// Per-security working lists, split by side, preserving insertion order.
#[derive(Default)]
struct SecurityLists {
    buy: Vec<OrderId>,
    sell: Vec<OrderId>,
}

impl SecurityLists {
    fn list(&self, side: Side) -> &Vec<OrderId> {
        match side {
            Side::Buy => &self.buy,
            Side::Sell => &self.sell,
        }
    }

    fn list_mut(&mut self, side: Side) -> &mut Vec<OrderId> {
        match side {
            Side::Buy => &mut self.buy,
            Side::Sell => &mut self.sell,
        }
    }
}

/// The four mappings named in the cache's specification, stored together so
/// that they are always mutated as one atomic unit: by-id, by-user,
/// by-security, and the per-security per-side working lists.
#[derive(Default)]
struct Indexes {
    by_id: HashMap<OrderId, Arc<Order>>,
    by_user: HashMap<UserId, HashSet<OrderId>>,
    by_security: HashMap<SecurityId, HashSet<OrderId>>,
    side_lists: HashMap<SecurityId, SecurityLists>,
}

/// The order store: a single `RwLock<Indexes>` per cache instance.
///
/// Every field of [`Indexes`] is mutated together under the write lock, per
/// the invariant that a live order appears in exactly four places at once.
/// Snapshot reads (candidate-id lists, `get_all_orders`) only need the read
/// lock.
#[derive(Default)]
pub(crate) struct OrderStore {
    indexes: RwLock<Indexes>,
}

impl OrderStore {
    pub(crate) fn new() -> Self {
        OrderStore::default()
    }

    /// Returns `true` and does nothing if `order_id` is already present
    /// (the caller is responsible for treating that as the "duplicate"
    /// case); otherwise inserts the order into all four indexes and
    /// returns `false`.
    pub(crate) fn insert(&self, order: Arc<Order>) -> bool {
        let mut idx = self.indexes.write();
        if idx.by_id.contains_key(order.order_id()) {
            return true;
        }
        idx.by_user
            .entry(order.user_id().clone())
            .or_default()
            .insert(order.order_id().clone());
        idx.by_security
            .entry(order.security_id().clone())
            .or_default()
            .insert(order.order_id().clone());
        idx.side_lists
            .entry(order.security_id().clone())
            .or_default()
            .list_mut(order.side())
            .push(order.order_id().clone());
        idx.by_id.insert(order.order_id().clone(), order);
        false
    }

    /// Removes `order_id` from all four indexes, returning the destroyed
    /// order's record if it was present. The per-security/per-side working
    /// lists are left with a stale entry (cheap tombstone); every scanner
    /// re-checks `by_id` membership before touching a candidate, so the
    /// stale id is simply skipped rather than compacted out eagerly.
    pub(crate) fn remove(&self, order_id: &OrderId) -> Option<Arc<Order>> {
        let mut idx = self.indexes.write();
        let order = idx.by_id.remove(order_id)?;

        if let Some(ids) = idx.by_user.get_mut(order.user_id()) {
            ids.remove(order_id);
            if ids.is_empty() {
                idx.by_user.remove(order.user_id());
            }
        }
        if let Some(ids) = idx.by_security.get_mut(order.security_id()) {
            ids.remove(order_id);
            if ids.is_empty() {
                idx.by_security.remove(order.security_id());
            }
        }
        Some(order)
    }

    pub(crate) fn contains(&self, order_id: &OrderId) -> bool {
        self.indexes.read().by_id.contains_key(order_id)
    }

    pub(crate) fn get(&self, order_id: &OrderId) -> Option<Arc<Order>> {
        self.indexes.read().by_id.get(order_id).cloned()
    }

    /// Snapshot of the live candidate ids for `security` on `side`, in
    /// insertion order. May contain ids of orders already cancelled; callers
    /// must re-check liveness via [`Self::get`] before acting on one.
    pub(crate) fn candidate_ids(&self, security: &SecurityId, side: Side) -> Vec<OrderId> {
        let idx = self.indexes.read();
        idx.side_lists
            .get(security)
            .map(|lists| lists.list(side).clone())
            .unwrap_or_default()
    }

    /// The set of order ids currently attributed to `user_id`, or `None` if
    /// the user has no tracked orders.
    pub(crate) fn user_order_ids(&self, user_id: &UserId) -> Option<Vec<OrderId>> {
        let idx = self.indexes.read();
        idx.by_user
            .get(user_id)
            .map(|ids| ids.iter().cloned().collect())
    }

    /// The set of order ids currently tracked for `security_id`, or `None`
    /// if the security has no tracked orders.
    pub(crate) fn security_order_ids(&self, security_id: &SecurityId) -> Option<Vec<OrderId>> {
        let idx = self.indexes.read();
        idx.by_security
            .get(security_id)
            .map(|ids| ids.iter().cloned().collect())
    }

    /// A stable snapshot of every live order, in insertion-ish order (the
    /// order the underlying hash map chooses to iterate in — stable within
    /// one snapshot, not across mutations, per the specification).
    pub(crate) fn snapshot_all(&self) -> Vec<Arc<Order>> {
        self.indexes.read().by_id.values().cloned().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.indexes.read().by_id.len()
    }
}
