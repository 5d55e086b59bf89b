//! Prelude module that re-exports the commonly used types.
//!
//! This module provides a convenient way to import the essential types from
//! this crate. Instead of importing each one individually:
//!
//! ```rust
//! use lotmatch_core::prelude::*;
//! ```

pub use crate::{
    CacheConfig, CacheError, CompanyId, MatchCache, MatchRecord, Order, OrderId, OrderView,
    SecurityId, Side, UserId,
};
