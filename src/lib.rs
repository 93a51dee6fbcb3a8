//! feedgraph - Request-scoped resolution for a microblog feed
//!
//! feedgraph turns normalized store records (users, tweets, favorites,
//! suggestions) into client-facing shapes. Relations and aggregates are
//! resolved through a per-request context so that each table is scanned at
//! most once per query, and a failure in one field never takes down its
//! siblings.
//!
//! # Architecture
//!
//! - **transform**: Pure record-to-shape functions (scalars only)
//! - **aggregator**: Counting folds (favorites per tweet, tweets per author)
//! - **cache**: Request-scoped id-to-record caches
//! - **resolver**: Request context, field resolvers and relation accessors
//! - **query**: Schema, selection sets, executor and the `QueryEngine`
//! - **config**: YAML configuration
//!
//! The record store itself lives in the `feedstore` crate.

// Core modules
pub mod aggregator;
pub mod cache;
pub mod resolver;
pub mod transform;

// Query surface
pub mod query;

// Ambient
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;

// Re-exports
pub use error::{FeedGraphError, Result};
pub use query::{QueryEngine, Response};
