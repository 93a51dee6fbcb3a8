//! Top-level fields
//!
//! These run first in a query and warm the caches and aggregates that
//! nested fields read afterwards.

use super::nodes::{FavoriteNode, SuggestionNode, TweetNode, UserNode};
use super::{RequestContext, ResolveError};
use std::future::Future;
use std::sync::Arc;

/// `currentUser`
///
/// Without a viewer handle this is the first user in store order, which is
/// stable for an unchanged store. A real session lookup would replace this.
pub async fn current_user(ctx: &RequestContext) -> Result<UserNode, ResolveError> {
    let users = ctx.user_rows().await?;

    let found = match ctx.settings().viewer_handle.as_deref() {
        Some(handle) => users.iter().find(|u| u.handle == handle).cloned().ok_or_else(|| {
            ResolveError::EmptyDataset {
                field: "currentUser",
                entity: "user",
                reason: format!("no user has handle '{}'", handle),
            }
        })?,
        None => users.first().cloned().ok_or_else(|| ResolveError::EmptyDataset {
            field: "currentUser",
            entity: "user",
            reason: "the store has no users".to_string(),
        })?,
    };

    Ok(UserNode::new(found))
}

/// `tweets`
///
/// Scans tweets and favorites (to fold the counts) before emitting any
/// tweet. The users scan runs alongside to warm the author cache; if it
/// fails the tweets still resolve and each `author` reports the failure.
pub async fn tweets(ctx: &RequestContext) -> Result<Vec<TweetNode>, ResolveError> {
    let warm_users = async {
        if ctx.settings().warm_user_cache {
            warm("users", ctx.user_rows()).await;
        }
    };

    let (scanned, ()) = futures::join!(
        async { futures::try_join!(ctx.tweet_rows(), ctx.favorite_counts()) },
        warm_users
    );
    let (rows, counts) = scanned?;

    tracing::debug!(tweets = rows.len(), "Resolved all tweets");

    Ok(rows
        .iter()
        .map(|tweet| TweetNode::new(Arc::clone(tweet), counts.count(&tweet.id)))
        .collect())
}

/// `favorites`
///
/// Warms both the user and tweet caches, since each favorite points at one
/// of each. Only the favorites scan itself can fail the list.
pub async fn favorites(ctx: &RequestContext) -> Result<Vec<FavoriteNode>, ResolveError> {
    let (rows, _, _) = futures::join!(
        ctx.favorite_rows(),
        warm("users", ctx.user_rows()),
        warm("tweets", ctx.tweet_rows())
    );
    Ok(rows?.iter().cloned().map(FavoriteNode::new).collect())
}

/// Run a cache-warming scan, keeping its failure out of the caller's result
///
/// A failed scan leaves its cell empty, so the relation that needs the rows
/// retries it and reports the error at its own field.
async fn warm<T>(table: &'static str, scan: impl Future<Output = Result<T, ResolveError>>) {
    if let Err(err) = scan.await {
        tracing::warn!(table, error = %err, "Cache warm-up scan failed");
    }
}

/// `suggestions`
pub async fn suggestions(ctx: &RequestContext) -> Result<Vec<SuggestionNode>, ResolveError> {
    Ok(ctx
        .suggestion_rows()
        .await?
        .into_iter()
        .map(SuggestionNode::new)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolverSettings;
    use async_trait::async_trait;
    use feedstore::{Db, DbFavorite, DbSuggestion, DbTweet, DbUser, MemoryDb, UserId};

    /// Serves everything but the users table
    struct UsersDown(MemoryDb);

    #[async_trait]
    impl Db for UsersDown {
        async fn list_users(&self) -> feedstore::Result<Vec<DbUser>> {
            Err(feedstore::Error::Unavailable("users shard down".to_string()))
        }

        async fn list_tweets(&self) -> feedstore::Result<Vec<DbTweet>> {
            self.0.list_tweets().await
        }

        async fn list_favorites(&self) -> feedstore::Result<Vec<DbFavorite>> {
            self.0.list_favorites().await
        }

        async fn list_suggestions(&self) -> feedstore::Result<Vec<DbSuggestion>> {
            self.0.list_suggestions().await
        }
    }

    fn context(db: MemoryDb, settings: ResolverSettings) -> RequestContext {
        RequestContext::new(Arc::new(db), settings)
    }

    #[tokio::test]
    async fn test_current_user_is_first_in_store_order() {
        let ctx = context(
            MemoryDb::builder()
                .user(DbUser::new("u2", "grace", "Grace"))
                .user(DbUser::new("u1", "ada", "Ada"))
                .build(),
            ResolverSettings::default(),
        );

        let first = current_user(&ctx).await.unwrap();
        let second = current_user(&ctx).await.unwrap();
        assert_eq!(first.user.id, UserId::new("u2"));
        assert!(Arc::ptr_eq(&first.user, &second.user));
    }

    #[tokio::test]
    async fn test_current_user_fails_on_empty_store() {
        let ctx = context(MemoryDb::default(), ResolverSettings::default());
        let err = current_user(&ctx).await.unwrap_err();
        assert_eq!(err.kind(), "empty_dataset");
    }

    #[tokio::test]
    async fn test_current_user_by_handle() {
        let settings = ResolverSettings {
            viewer_handle: Some("ada".to_string()),
            ..Default::default()
        };
        let ctx = context(
            MemoryDb::builder()
                .user(DbUser::new("u2", "grace", "Grace"))
                .user(DbUser::new("u1", "ada", "Ada"))
                .build(),
            settings,
        );

        assert_eq!(current_user(&ctx).await.unwrap().user.handle, "ada");
    }

    #[tokio::test]
    async fn test_tweets_warm_author_cache() {
        let ctx = context(
            MemoryDb::builder()
                .user(DbUser::new("u1", "ada", "Ada"))
                .tweet(DbTweet::new("t1", "u1", "hello"))
                .tweet(DbTweet::new("t2", "u1", "again"))
                .favorite(DbFavorite::new("f1", "t1", "u1"))
                .build(),
            ResolverSettings::default(),
        );

        let nodes = tweets(&ctx).await.unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].favorite_count, 1);
        assert_eq!(nodes[1].favorite_count, 0);
        assert!(ctx.user_cache().peek(&UserId::new("u1")).is_some());

        nodes[0].author(&ctx).await.unwrap();
        assert_eq!(ctx.user_cache_stats().misses, 0);
    }

    #[tokio::test]
    async fn test_tweets_without_warming_fall_back_per_author() {
        let settings = ResolverSettings {
            warm_user_cache: false,
            ..Default::default()
        };
        let ctx = context(
            MemoryDb::builder()
                .user(DbUser::new("u1", "ada", "Ada"))
                .tweet(DbTweet::new("t1", "u1", "hello"))
                .build(),
            settings,
        );

        let nodes = tweets(&ctx).await.unwrap();
        assert!(ctx.user_cache().is_empty());

        let author = nodes[0].author(&ctx).await.unwrap();
        assert_eq!(author.user.handle, "ada");
        assert_eq!(ctx.user_cache_stats().misses, 1);
    }

    #[tokio::test]
    async fn test_failed_user_warm_up_does_not_fail_lists() {
        let db = MemoryDb::builder()
            .tweet(DbTweet::new("t1", "u1", "hello"))
            .favorite(DbFavorite::new("f1", "t1", "u1"))
            .build();
        let ctx = RequestContext::new(Arc::new(UsersDown(db)), ResolverSettings::default());

        let nodes = tweets(&ctx).await.unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].favorite_count, 1);

        let favs = favorites(&ctx).await.unwrap();
        assert_eq!(favs.len(), 1);

        // The relation retries the scan and reports the store failure itself
        let err = nodes[0].author(&ctx).await.unwrap_err();
        assert_eq!(err.kind(), "store");
        assert!(favs[0].tweet(&ctx).await.is_ok());
    }
}
