//! Typed errors surfaced by the cache facade in strict-validation mode.

use thiserror::Error;

use crate::cache::order::{OrderId, SecurityId, UserId};

/// Errors the cache facade can report.
///
/// In lenient mode (the default, see [`crate::CacheConfig`]) these are
/// absorbed into silent no-ops or zero-valued reads by the facade methods;
/// in strict mode they are returned to the caller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CacheError {
    /// `add_order` was called with an id already present in the cache.
    #[error("duplicate order id: {0}")]
    DuplicateOrder(OrderId),

    /// A cancel or query targeted an order id that does not exist.
    #[error("unknown order id: {0}")]
    UnknownOrder(OrderId),

    /// A cancel targeted a user id with no tracked orders.
    #[error("unknown user id: {0}")]
    UnknownUser(UserId),

    /// A query or cancel targeted a security id with no tracked orders.
    #[error("unknown security id: {0}")]
    UnknownSecurity(SecurityId),
}
