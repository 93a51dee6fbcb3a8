//! Record store for the feedgraph social-feed dataset
//!
//! Holds normalized users, tweets, favorites and suggestions, and offers
//! whole-table scans only. Filtering and joining belong to the caller.
//!
//! # Example
//!
//! ```no_run
//! use feedstore::{Db, MemoryDb};
//!
//! # async fn demo() -> feedstore::Result<()> {
//! let db = MemoryDb::load("db.json")?;
//!
//! let tweets = db.list_tweets().await?;
//! let favorites = db.list_favorites().await?;
//! println!("{} tweets, {} favorites", tweets.len(), favorites.len());
//! # Ok(())
//! # }
//! ```

mod ids;
mod memory;
mod records;

use async_trait::async_trait;
use thiserror::Error;

pub use ids::{FavoriteId, TweetId, UserId};
pub use memory::{MemoryDb, MemoryDbBuilder};
pub use records::{DbFavorite, DbSuggestion, DbTweet, DbUser, Snapshot};

/// Errors that can occur when reading from a store
#[derive(Error, Debug)]
pub enum Error {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Read interface of a record store
///
/// Every method is a full scan with no filter or pagination parameters.
/// Rows come back in store order, which callers may rely on being stable
/// for an unchanged store.
#[async_trait]
pub trait Db: Send + Sync {
    /// Scan the users table
    async fn list_users(&self) -> Result<Vec<DbUser>>;

    /// Scan the tweets table
    async fn list_tweets(&self) -> Result<Vec<DbTweet>>;

    /// Scan the favorites join table
    async fn list_favorites(&self) -> Result<Vec<DbFavorite>>;

    /// Scan the suggestions table
    async fn list_suggestions(&self) -> Result<Vec<DbSuggestion>>;
}
