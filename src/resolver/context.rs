//! Per-request resolution context
//!
//! Everything a resolver may share with its siblings lives here: the entity
//! caches, the memoized table scans and the aggregates folded from them. A
//! context is created for one query and dropped with it.

use super::ResolveError;
use crate::aggregator::{self, FavoriteCounts, FavoritesGiven, TweetCounts};
use crate::cache::{CacheStats, EntityCache};
use crate::config::FeedGraphConfig;
use crate::metrics;
use feedstore::{Db, DbFavorite, DbSuggestion, DbTweet, DbUser, TweetId, UserId};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Rows from one table scan, shared by every resolver in the request
pub type Rows<T> = Arc<Vec<Arc<T>>>;

/// Resolver knobs taken from configuration
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// Scan users while resolving "all tweets"
    pub warm_user_cache: bool,

    /// Handle of the viewer; `None` selects the first user in store order
    pub viewer_handle: Option<String>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            warm_user_cache: true,
            viewer_handle: None,
        }
    }
}

impl From<&FeedGraphConfig> for ResolverSettings {
    fn from(config: &FeedGraphConfig) -> Self {
        Self {
            warm_user_cache: config.request.warm_user_cache,
            viewer_handle: config.viewer.handle.clone(),
        }
    }
}

/// Shared state for one query
///
/// Each table is scanned at most once per request; the scan populates the
/// matching entity cache and every aggregate is folded from that same
/// snapshot, so no resolver can observe a partial fold or two different
/// versions of a table. Concurrent first readers of a scan or aggregate wait
/// on the single in-flight build.
pub struct RequestContext {
    db: Arc<dyn Db>,
    settings: ResolverSettings,

    users: EntityCache<DbUser>,
    tweets: EntityCache<DbTweet>,

    user_rows: OnceCell<Rows<DbUser>>,
    tweet_rows: OnceCell<Rows<DbTweet>>,
    favorite_rows: OnceCell<Rows<DbFavorite>>,

    favorite_counts: OnceCell<Arc<FavoriteCounts>>,
    tweet_counts: OnceCell<Arc<TweetCounts>>,
    favorites_given: OnceCell<Arc<FavoritesGiven>>,
}

impl RequestContext {
    pub fn new(db: Arc<dyn Db>, settings: ResolverSettings) -> Self {
        Self {
            db,
            settings,
            users: EntityCache::new(),
            tweets: EntityCache::new(),
            user_rows: OnceCell::new(),
            tweet_rows: OnceCell::new(),
            favorite_rows: OnceCell::new(),
            favorite_counts: OnceCell::new(),
            tweet_counts: OnceCell::new(),
            favorites_given: OnceCell::new(),
        }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    pub fn user_cache(&self) -> &EntityCache<DbUser> {
        &self.users
    }

    pub fn tweet_cache(&self) -> &EntityCache<DbTweet> {
        &self.tweets
    }

    pub fn user_cache_stats(&self) -> CacheStats {
        self.users.stats()
    }

    pub fn tweet_cache_stats(&self) -> CacheStats {
        self.tweets.stats()
    }

    // --- Table scans ---

    /// All users in store order; the first call scans and warms the user cache
    pub async fn user_rows(&self) -> Result<Rows<DbUser>, ResolveError> {
        let rows = self
            .user_rows
            .get_or_try_init(|| async {
                metrics::record_store_scan("users");
                let rows: Vec<Arc<DbUser>> =
                    self.db.list_users().await?.into_iter().map(Arc::new).collect();
                self.users.populate(rows.iter().cloned());
                Ok::<_, ResolveError>(Arc::new(rows))
            })
            .await?;
        Ok(rows.clone())
    }

    /// All tweets in store order; the first call scans and warms the tweet cache
    pub async fn tweet_rows(&self) -> Result<Rows<DbTweet>, ResolveError> {
        let rows = self
            .tweet_rows
            .get_or_try_init(|| async {
                metrics::record_store_scan("tweets");
                let rows: Vec<Arc<DbTweet>> =
                    self.db.list_tweets().await?.into_iter().map(Arc::new).collect();
                self.tweets.populate(rows.iter().cloned());
                Ok::<_, ResolveError>(Arc::new(rows))
            })
            .await?;
        Ok(rows.clone())
    }

    /// All favorites in store order
    pub async fn favorite_rows(&self) -> Result<Rows<DbFavorite>, ResolveError> {
        let rows = self
            .favorite_rows
            .get_or_try_init(|| async {
                metrics::record_store_scan("favorites");
                let rows: Vec<Arc<DbFavorite>> = self
                    .db
                    .list_favorites()
                    .await?
                    .into_iter()
                    .map(Arc::new)
                    .collect();
                Ok::<_, ResolveError>(Arc::new(rows))
            })
            .await?;
        Ok(rows.clone())
    }

    /// Suggestions are passed straight through and never cached
    pub async fn suggestion_rows(&self) -> Result<Vec<Arc<DbSuggestion>>, ResolveError> {
        metrics::record_store_scan("suggestions");
        Ok(self
            .db
            .list_suggestions()
            .await?
            .into_iter()
            .map(Arc::new)
            .collect())
    }

    // --- Aggregates ---

    /// Favorites per tweet, folded once per request
    pub async fn favorite_counts(&self) -> Result<Arc<FavoriteCounts>, ResolveError> {
        let counts = self
            .favorite_counts
            .get_or_try_init(|| async {
                let rows = self.favorite_rows().await?;
                let counts = aggregator::favorite_counts(rows.iter().map(|f| &**f));
                metrics::record_aggregate_build("favorite_counts");
                tracing::debug!(
                    favorites = rows.len(),
                    tweets = counts.len(),
                    "Built favorite counts"
                );
                Ok::<_, ResolveError>(Arc::new(counts))
            })
            .await?;
        Ok(counts.clone())
    }

    /// Tweets per author, folded once per request
    pub async fn tweet_counts(&self) -> Result<Arc<TweetCounts>, ResolveError> {
        let counts = self
            .tweet_counts
            .get_or_try_init(|| async {
                let rows = self.tweet_rows().await?;
                let counts = aggregator::tweet_counts(rows.iter().map(|t| &**t));
                metrics::record_aggregate_build("tweet_counts");
                tracing::debug!(tweets = rows.len(), authors = counts.len(), "Built tweet counts");
                Ok::<_, ResolveError>(Arc::new(counts))
            })
            .await?;
        Ok(counts.clone())
    }

    /// Favorites given per user, folded once per request
    pub async fn favorites_given(&self) -> Result<Arc<FavoritesGiven>, ResolveError> {
        let counts = self
            .favorites_given
            .get_or_try_init(|| async {
                let rows = self.favorite_rows().await?;
                let counts = aggregator::favorites_given(rows.iter().map(|f| &**f));
                metrics::record_aggregate_build("favorites_given");
                Ok::<_, ResolveError>(Arc::new(counts))
            })
            .await?;
        Ok(counts.clone())
    }

    // --- Entity lookups ---

    /// Look up a user by id: cache first, then one users scan
    ///
    /// An id absent from both is an integrity error, not a null.
    pub async fn user(&self, id: &UserId) -> Result<Arc<DbUser>, ResolveError> {
        if let Some(user) = self.users.get(id) {
            return Ok(user);
        }

        tracing::debug!(id = %id, "User cache miss, falling back to store");
        self.user_rows().await?;

        self.users
            .peek(id)
            .ok_or_else(|| ResolveError::integrity("user", id))
    }

    /// Look up a tweet by id: cache first, then one tweets scan
    pub async fn tweet(&self, id: &TweetId) -> Result<Arc<DbTweet>, ResolveError> {
        if let Some(tweet) = self.tweets.get(id) {
            return Ok(tweet);
        }

        tracing::debug!(id = %id, "Tweet cache miss, falling back to store");
        self.tweet_rows().await?;

        self.tweets
            .peek(id)
            .ok_or_else(|| ResolveError::integrity("tweet", id))
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("settings", &self.settings)
            .field("users", &self.users)
            .field("tweets", &self.tweets)
            .field("favorite_counts_built", &self.favorite_counts.initialized())
            .finish()
    }
}
