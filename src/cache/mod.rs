//! Request-scoped cache layer
//!
//! Memoizes entity lookups by id for the duration of one query, so an author
//! shared by many tweets is fetched once.

mod entity;

pub use entity::{CacheStats, EntityCache, Keyed};
