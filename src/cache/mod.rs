//! The order-matching cache: order records, indexes, matcher, and facade.

mod config;
mod error;
mod facade;
mod indexes;
mod match_cache;
mod match_log;
mod matcher;
mod order;

pub use config::CacheConfig;
pub use error::CacheError;
pub use facade::MatchCache;
pub use match_log::MatchRecord;
pub use order::{CompanyId, Order, OrderId, OrderView, SecurityId, Side, UserId};
