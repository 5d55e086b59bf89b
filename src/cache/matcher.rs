//! The unsorted-greedy volume matcher.

use std::sync::Arc;

use parking_lot::RwLockWriteGuard;
use tracing::trace;

use crate::cache::indexes::OrderStore;
use crate::cache::match_cache::MatchCacheTable;
use crate::cache::match_log::{MatchLog, MatchRecord};
use crate::cache::order::{Order, Side};

/// Locks both orders' working-quantity cells and commits `min(subject, candidate)`
/// lots to each, returning the matched quantity (zero if either side was
/// already exhausted).
///
/// Locks are acquired in a single global order — whichever order id sorts
/// first — rather than strictly "subject, then counterparty". A pure
/// subject-then-counterparty rule is only deadlock-free when exactly one
/// order is in the subject role system-wide; under this cache's full
/// concurrency model (lazy-mode parallel driving can make two different
/// orders each other's counterparty at the same time) that degenerates into
/// a classic two-lock AB-BA deadlock. A total order over ids subsumes the
/// spec's rule in the single-matcher case and remains deadlock-free under
/// arbitrary concurrent matchers, since no two threads can ever want the
/// same two locks in opposite order.
fn lock_both<'a>(
    subject: &'a Order,
    candidate: &'a Order,
) -> (RwLockWriteGuard<'a, u64>, RwLockWriteGuard<'a, u64>) {
    if subject.order_id() <= candidate.order_id() {
        let s = subject.working_qty_lock().write();
        let c = candidate.working_qty_lock().write();
        (s, c)
    } else {
        let c = candidate.working_qty_lock().write();
        let s = subject.working_qty_lock().write();
        (s, c)
    }
}

fn fill_pair(subject: &Order, candidate: &Order) -> u64 {
    let (mut s_guard, mut c_guard) = lock_both(subject, candidate);
    let m = (*s_guard).min(*c_guard);
    *s_guard -= m;
    *c_guard -= m;
    m
}

/// Runs the unsorted-greedy matcher for `subject` against the opposite-side
/// working list for its security, mutating working quantities, appending to
/// `match_log` when enabled, and adding the total matched volume to
/// `match_cache`. Returns the total quantity matched by this call.
///
/// Idempotent: calling this again after `subject` is fully filled, or with
/// no eligible counterparties left, returns zero and mutates nothing.
pub(crate) fn run_match(
    subject: &Arc<Order>,
    store: &OrderStore,
    match_cache: &MatchCacheTable,
    match_log: Option<&MatchLog>,
) -> u64 {
    if subject.is_filled() {
        return 0;
    }

    let opposite_side = subject.side().opposite();
    let candidates = store.candidate_ids(subject.security_id(), opposite_side);
    let mut total_matched = 0u64;

    for candidate_id in candidates {
        if subject.is_filled() {
            break;
        }

        let Some(candidate) = store.get(&candidate_id) else {
            // Cancelled between the snapshot and now; never enters matching.
            continue;
        };
        if candidate.is_filled() {
            continue;
        }
        if candidate.company_id() == subject.company_id() {
            continue;
        }

        let matched = fill_pair(subject, &candidate);
        if matched == 0 {
            continue;
        }

        trace!(
            subject = %subject.order_id(),
            candidate = %candidate.order_id(),
            security = %subject.security_id(),
            qty = matched,
            "matched lots"
        );

        total_matched += matched;

        if let Some(log) = match_log {
            let (buy_id, sell_id) = match subject.side() {
                Side::Buy => (subject.order_id().clone(), candidate.order_id().clone()),
                Side::Sell => (candidate.order_id().clone(), subject.order_id().clone()),
            };
            log.append(
                subject.security_id(),
                MatchRecord { buy_id, sell_id, qty: matched },
            );
        }
    }

    match_cache.add(subject.security_id(), total_matched);
    total_matched
}
