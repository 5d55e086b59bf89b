//! The public cache surface: add, cancel, and aggregate-query operations.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::cache::config::{CacheConfig, PARALLEL_CANCEL_CHUNK_THRESHOLD};
use crate::cache::error::CacheError;
use crate::cache::indexes::OrderStore;
use crate::cache::match_cache::MatchCacheTable;
use crate::cache::match_log::{MatchLog, MatchRecord};
use crate::cache::matcher::run_match;
use crate::cache::order::{Order, OrderId, OrderView, SecurityId, Side, UserId};

/// The in-memory order-matching cache.
///
/// Accepts buy and sell orders for named securities, indexes them so they
/// can be located, cancelled, and aggregated in constant time, and reports
/// — per security — the total quantity of lots that can be matched between
/// buyers and sellers subject to the same-company exclusion rule.
///
/// Cheaply clonable: internally every index and counter is behind its own
/// lock or lock-free structure, so a `MatchCache` can be wrapped in an
/// `Arc` (or cloned, since cloning is just cloning a handful of `Arc`s) and
/// shared across threads directly.
pub struct MatchCache {
    store: OrderStore,
    match_cache: MatchCacheTable,
    match_log: Option<MatchLog>,
    config: CacheConfig,
}

impl Default for MatchCache {
    fn default() -> Self {
        MatchCache::new()
    }
}

impl MatchCache {
    /// Creates an empty cache using [`CacheConfig::default`].
    pub fn new() -> Self {
        MatchCache::with_config(CacheConfig::default())
    }

    /// Creates an empty cache with an explicit configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        MatchCache {
            store: OrderStore::new(),
            match_cache: MatchCacheTable::new(),
            match_log: config.match_log_enabled().then(MatchLog::new),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Total number of live (not yet cancelled) orders in the cache.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn absorb<T: Default>(&self, result: Result<T, CacheError>) -> Result<T, CacheError> {
        match result {
            Err(err) if !self.config.strict_validation() => {
                debug!(error = %err, "absorbing error in lenient mode");
                Ok(T::default())
            }
            other => other,
        }
    }

    /// Admits `order` into the cache.
    ///
    /// In lenient mode (default) a duplicate id is a silent no-op and this
    /// returns `Ok(())`; in strict mode it returns
    /// [`CacheError::DuplicateOrder`]. In eager mode (default) the matcher
    /// runs against the opposite side before this call returns.
    pub fn add_order(&self, order: Order) -> Result<(), CacheError> {
        let order_id = order.order_id().clone();
        let order = Arc::new(order);
        let already_present = self.store.insert(order.clone());
        if already_present {
            warn!(order_id = %order_id, "rejected duplicate order id");
            return self.absorb(Err(CacheError::DuplicateOrder(order_id)));
        }

        trace!(
            order_id = %order.order_id(),
            security = %order.security_id(),
            side = %order.side(),
            qty = order.qty(),
            "admitted order"
        );

        if self.config.eager_match() {
            run_match(&order, &self.store, &self.match_cache, self.match_log.as_ref());
        }
        Ok(())
    }

    /// Removes `order_id` from every index and destroys its record.
    ///
    /// Does not adjust the match cache: matches are historical events and
    /// are never rolled back by a later cancellation.
    pub fn cancel_order(&self, order_id: &OrderId) -> Result<(), CacheError> {
        match self.store.remove(order_id) {
            Some(_) => {
                trace!(order_id = %order_id, "cancelled order");
                Ok(())
            }
            None => self.absorb(Err(CacheError::UnknownOrder(order_id.clone()))),
        }
    }

    /// Cancels every order currently attributed to `user_id`.
    ///
    /// Snapshots the user's order-id set, then cancels each one. When
    /// [`CacheConfig::parallel_cancellation`] is enabled and the batch
    /// exceeds the internal chunk threshold, the cancellations are fanned
    /// out across scoped threads — a pure performance optimization that
    /// does not change the final state versus cancelling serially.
    pub fn cancel_orders_for_user(&self, user_id: &UserId) -> Result<(), CacheError> {
        let Some(ids) = self.store.user_order_ids(user_id) else {
            return self.absorb(Err(CacheError::UnknownUser(user_id.clone())));
        };
        self.cancel_ids(&ids);
        Ok(())
    }

    /// Cancels every order for `security_id` whose *original* `qty` is
    /// greater than or equal to `min_qty`. The comparison uses the order's
    /// fixed total quantity, not its current working quantity.
    pub fn cancel_orders_for_security_with_min_qty(
        &self,
        security_id: &SecurityId,
        min_qty: u64,
    ) -> Result<(), CacheError> {
        let Some(ids) = self.store.security_order_ids(security_id) else {
            return self.absorb(Err(CacheError::UnknownSecurity(security_id.clone())));
        };
        let eligible: Vec<OrderId> = ids
            .into_iter()
            .filter_map(|id| {
                let order = self.store.get(&id)?;
                (order.qty() >= min_qty).then_some(id)
            })
            .collect();
        self.cancel_ids(&eligible);
        Ok(())
    }

    fn cancel_ids(&self, ids: &[OrderId]) {
        if self.config.parallel_cancellation() && ids.len() > PARALLEL_CANCEL_CHUNK_THRESHOLD {
            let chunk_size = (ids.len() / num_cancel_chunks()).max(1);
            crossbeam::thread::scope(|scope| {
                for chunk in ids.chunks(chunk_size) {
                    scope.spawn(move |_| {
                        for id in chunk {
                            let _ = self.store.remove(id);
                        }
                    });
                }
            })
            .expect("cancellation worker thread panicked");
        } else {
            for id in ids {
                let _ = self.store.remove(id);
            }
        }
    }

    /// Returns the per-security matched-lot total.
    ///
    /// In eager mode (default) this is an O(1) read of the memoized
    /// counter. In lazy mode this first drives the matcher across every
    /// buy-side order for `security_id`, then reads the counter.
    pub fn get_matching_size_for_security(&self, security_id: &SecurityId) -> Result<u64, CacheError> {
        if !self.config.eager_match() {
            self.drive_lazy_matching(security_id);
        }
        if !self.match_cache.contains(security_id) && !self.store_has_security(security_id) {
            return self.absorb(Err(CacheError::UnknownSecurity(security_id.clone())));
        }
        Ok(self.match_cache.get(security_id))
    }

    fn store_has_security(&self, security_id: &SecurityId) -> bool {
        self.store.security_order_ids(security_id).is_some()
    }

    /// Drives the matcher for every buy-side order of `security_id`, in
    /// the candidate list's insertion order.
    ///
    /// This is deliberately sequential, never fanned out across threads:
    /// the unsorted-greedy algorithm is order-sensitive under the
    /// same-company exclusion (which buy order reaches a contested sell
    /// order first can change the total matched volume), so running two
    /// buy orders of the same security concurrently can make lazy mode
    /// disagree with eager mode's strictly sequential insertion-order
    /// scan. `parallel_cancellation` only ever fans out across chunks of
    /// *independent* cancellations or across *distinct* securities, never
    /// across buy orders competing for the same security's sell list.
    fn drive_lazy_matching(&self, security_id: &SecurityId) {
        let buy_ids = self.store.candidate_ids(security_id, Side::Buy);
        for id in &buy_ids {
            if let Some(order) = self.store.get(id) {
                run_match(&order, &self.store, &self.match_cache, self.match_log.as_ref());
            }
        }
    }

    /// A stable snapshot of every live order in the cache.
    pub fn get_all_orders(&self) -> Vec<OrderView> {
        self.store.snapshot_all().iter().map(OrderView::from).collect()
    }

    /// Match-event records for `security_id`, in arrival order. Requires
    /// [`CacheConfig::with_match_log`] to have been enabled; returns an
    /// empty sequence otherwise. In lazy mode this drives the matcher first,
    /// mirroring eager-mode behavior exactly.
    pub fn get_order_matches_by_security(
        &self,
        security_id: &SecurityId,
    ) -> Result<Vec<MatchRecord>, CacheError> {
        let Some(log) = &self.match_log else {
            return Ok(Vec::new());
        };
        if !self.config.eager_match() {
            self.drive_lazy_matching(security_id);
        }
        if !self.store_has_security(security_id) && log.for_security(security_id).is_empty() {
            return self.absorb(Err(CacheError::UnknownSecurity(security_id.clone())));
        }
        Ok(log.for_security(security_id))
    }
}

fn num_cancel_chunks() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
}
