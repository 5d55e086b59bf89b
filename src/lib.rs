//! `lotmatch-core`: an in-memory, multi-indexed order-matching cache.
//!
//! The cache accepts buy and sell orders for named securities, tracks them
//! by id, by user, and by security, and reports — per security — the total
//! quantity of lots that can be matched between buyers and sellers, subject
//! to one rule: an order never matches against a counterparty from its own
//! company.
//!
//! There is no concept of price, time priority, or partial-fill carry-over
//! beyond working quantity; see [`MatchCache`] for the full operation set.
//!
//! ```
//! use lotmatch_core::{MatchCache, Order, Side};
//!
//! let cache = MatchCache::new();
//! cache.add_order(Order::new("B1", "ACME", Side::Buy, 100, "alice", "Fidelity")).unwrap();
//! cache.add_order(Order::new("S1", "ACME", Side::Sell, 40, "bob", "Vanguard")).unwrap();
//!
//! assert_eq!(
//!     cache.get_matching_size_for_security(&"ACME".into()).unwrap(),
//!     40
//! );
//! ```

mod cache;
pub mod prelude;

pub use cache::{
    CacheConfig, CacheError, CompanyId, MatchCache, MatchRecord, Order, OrderId, OrderView,
    SecurityId, Side, UserId,
};
