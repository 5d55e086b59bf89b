//! The order record: immutable attributes plus a lockable working quantity.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// An opaque, cheaply-clonable identifier.
///
/// Wraps an `Arc<str>` rather than a `String` so that every index entry
/// (by-id key, by-user set member, per-security working list slot) shares
/// the same backing allocation instead of cloning the string on every
/// insertion.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle(Arc<str>);

impl Handle {
    fn new(s: impl Into<Arc<str>>) -> Self {
        Handle(s.into())
    }

    /// Borrow the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<T: Into<Arc<str>>> From<T> for Handle {
    fn from(value: T) -> Self {
        Handle::new(value)
    }
}

macro_rules! opaque_id {
    ($name:ident) => {
        #[doc = concat!("Opaque identifier type (see [`Handle`]) for a ", stringify!($name), ".")]
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Handle);

        impl $name {
            /// Borrow the underlying string.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(&self.0, f)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl<T: Into<Handle>> From<T> for $name {
            fn from(value: T) -> Self {
                $name(value.into())
            }
        }
    };
}

opaque_id!(OrderId);
opaque_id!(SecurityId);
opaque_id!(UserId);
opaque_id!(CompanyId);

/// The side of an order: buyer or seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side a matching counterparty must be on.
    #[must_use]
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "Buy"),
            Side::Sell => write!(f, "Sell"),
        }
    }
}

/// Parses a side from the legacy string contract: the literal `"Sell"`
/// means [`Side::Sell`], every other value (including unrecognized
/// strings) means [`Side::Buy`].
///
/// This is a compatibility rule inherited from the system this cache
/// models, not a validated enumeration — callers that want strict
/// validation should construct [`Side`] directly instead of going
/// through a raw string.
impl From<&str> for Side {
    fn from(raw: &str) -> Self {
        if raw == "Sell" { Side::Sell } else { Side::Buy }
    }
}

/// An immutable order descriptor with a mutable, lockable working quantity.
///
/// Every field except `working_qty` is fixed at construction. `working_qty`
/// is guarded by its own [`parking_lot::RwLock`] so that readers holding a
/// cloned `Arc<Order>` (e.g. a snapshot returned by
/// [`crate::MatchCache::get_all_orders`]) observe a consistent value without
/// needing to hold the cache's index lock.
#[derive(Debug)]
pub struct Order {
    order_id: OrderId,
    security_id: SecurityId,
    side: Side,
    qty: u64,
    user_id: UserId,
    company_id: CompanyId,
    working_qty: RwLock<u64>,
}

impl Order {
    /// Builds a new order with `working_qty` initialized to `qty`.
    ///
    /// # Panics
    /// Panics if `qty` is zero — the data model requires a non-zero total
    /// quantity (§3 of the cache's specification).
    pub fn new(
        order_id: impl Into<OrderId>,
        security_id: impl Into<SecurityId>,
        side: Side,
        qty: u64,
        user_id: impl Into<UserId>,
        company_id: impl Into<CompanyId>,
    ) -> Self {
        assert!(qty > 0, "order quantity must be non-zero");
        Order {
            order_id: order_id.into(),
            security_id: security_id.into(),
            side,
            qty,
            user_id: user_id.into(),
            company_id: company_id.into(),
            working_qty: RwLock::new(qty),
        }
    }

    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    pub fn security_id(&self) -> &SecurityId {
        &self.security_id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// The fixed total quantity this order was created with.
    pub fn qty(&self) -> u64 {
        self.qty
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn company_id(&self) -> &CompanyId {
        &self.company_id
    }

    /// The current, un-filled remainder of `qty`.
    pub fn working_qty(&self) -> u64 {
        *self.working_qty.read()
    }

    /// `qty - working_qty`.
    pub fn filled_qty(&self) -> u64 {
        self.qty - self.working_qty()
    }

    /// `true` once `working_qty` has reached zero.
    pub fn is_filled(&self) -> bool {
        self.working_qty() == 0
    }

    /// Saturating subtract: `working_qty := max(0, working_qty - n)`.
    pub fn fill(&self, n: u64) {
        let mut guard = self.working_qty.write();
        *guard = guard.saturating_sub(n);
    }

    /// Saturating add: `working_qty := min(qty, working_qty + n)`.
    pub fn unfill(&self, n: u64) {
        let mut guard = self.working_qty.write();
        *guard = (*guard + n).min(self.qty);
    }

    /// Resets `working_qty` back to `qty`. Intended for test harnesses that
    /// want to replay a sequence of matches against a pristine order.
    pub fn reset_fills(&self) {
        *self.working_qty.write() = self.qty;
    }

    pub(crate) fn working_qty_lock(&self) -> &RwLock<u64> {
        &self.working_qty
    }
}

/// An immutable point-in-time copy of an [`Order`]'s fields, returned from
/// snapshot queries so that callers are not handed a live `Arc<Order>`
/// they could use to keep the order's lock machinery alive indefinitely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderView {
    pub order_id: OrderId,
    pub security_id: SecurityId,
    pub side: Side,
    pub qty: u64,
    pub working_qty: u64,
    pub user_id: UserId,
    pub company_id: CompanyId,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        OrderView {
            order_id: order.order_id.clone(),
            security_id: order.security_id.clone(),
            side: order.side,
            qty: order.qty,
            working_qty: order.working_qty(),
            user_id: order.user_id.clone(),
            company_id: order.company_id.clone(),
        }
    }
}

impl From<&Arc<Order>> for OrderView {
    fn from(order: &Arc<Order>) -> Self {
        OrderView::from(order.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_saturates_at_zero() {
        let order = Order::new("O1", "SEC", Side::Buy, 10, "U1", "C1");
        order.fill(15);
        assert_eq!(order.working_qty(), 0);
        assert!(order.is_filled());
    }

    #[test]
    fn unfill_saturates_at_qty() {
        let order = Order::new("O1", "SEC", Side::Buy, 10, "U1", "C1");
        order.fill(7);
        order.unfill(100);
        assert_eq!(order.working_qty(), 10);
    }

    #[test]
    fn filled_qty_is_complement_of_working_qty() {
        let order = Order::new("O1", "SEC", Side::Buy, 10, "U1", "C1");
        order.fill(4);
        assert_eq!(order.filled_qty(), 4);
        assert_eq!(order.working_qty(), 6);
    }

    #[test]
    fn reset_fills_restores_qty() {
        let order = Order::new("O1", "SEC", Side::Buy, 10, "U1", "C1");
        order.fill(10);
        order.reset_fills();
        assert_eq!(order.working_qty(), 10);
    }

    #[test]
    fn side_from_str_is_literal_sell() {
        assert_eq!(Side::from("Sell"), Side::Sell);
        assert_eq!(Side::from("SELL"), Side::Buy);
        assert_eq!(Side::from("Buy"), Side::Buy);
        assert_eq!(Side::from("garbage"), Side::Buy);
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn zero_qty_panics() {
        Order::new("O1", "SEC", Side::Buy, 0, "U1", "C1");
    }
}
