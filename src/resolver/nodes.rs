//! Resolved objects and their relation accessors
//!
//! Each node pairs a base shape (scalars, from [`crate::transform`]) with
//! async accessors for the relations the transform leaves out.

use super::{RequestContext, ResolveError};
use crate::transform::{
    favorite_transform, suggestion_transform, tweet_transform, user_transform, FavoriteShape,
    PublicTweet, SuggestionShape, UserShape, UserStatsShape,
};
use feedstore::{DbFavorite, DbSuggestion, DbTweet, DbUser};
use std::sync::Arc;

/// A resolved user
#[derive(Debug, Clone)]
pub struct UserNode {
    pub user: Arc<DbUser>,
}

impl UserNode {
    pub fn new(user: Arc<DbUser>) -> Self {
        Self { user }
    }

    pub fn shape(&self) -> UserShape {
        user_transform(&self.user)
    }

    /// Authored tweets and given favorites, from request-wide tallies
    pub async fn stats(&self, ctx: &RequestContext) -> Result<UserStatsShape, ResolveError> {
        let (tweets, favorites) =
            futures::try_join!(ctx.tweet_counts(), ctx.favorites_given())?;
        Ok(UserStatsShape {
            tweet_count: tweets.count(&self.user.id),
            favorite_count: favorites.count(&self.user.id),
        })
    }
}

/// A resolved tweet with its favorite count already attached
#[derive(Debug, Clone)]
pub struct TweetNode {
    pub tweet: Arc<DbTweet>,
    pub favorite_count: u64,
}

impl TweetNode {
    pub fn new(tweet: Arc<DbTweet>, favorite_count: u64) -> Self {
        Self {
            tweet,
            favorite_count,
        }
    }

    /// Build a node, reading the count from the request's favorite tally
    pub async fn with_count(
        tweet: Arc<DbTweet>,
        ctx: &RequestContext,
    ) -> Result<Self, ResolveError> {
        let counts = ctx.favorite_counts().await?;
        let favorite_count = counts.count(&tweet.id);
        Ok(Self::new(tweet, favorite_count))
    }

    pub fn shape(&self) -> PublicTweet {
        PublicTweet {
            base: tweet_transform(&self.tweet),
            favorite_count: self.favorite_count,
        }
    }

    pub async fn author(&self, ctx: &RequestContext) -> Result<UserNode, ResolveError> {
        ctx.user(&self.tweet.user_id).await.map(UserNode::new)
    }
}

/// A resolved favorite
#[derive(Debug, Clone)]
pub struct FavoriteNode {
    pub favorite: Arc<DbFavorite>,
}

impl FavoriteNode {
    pub fn new(favorite: Arc<DbFavorite>) -> Self {
        Self { favorite }
    }

    pub fn shape(&self) -> FavoriteShape {
        favorite_transform(&self.favorite)
    }

    pub async fn user(&self, ctx: &RequestContext) -> Result<UserNode, ResolveError> {
        ctx.user(&self.favorite.user_id).await.map(UserNode::new)
    }

    pub async fn tweet(&self, ctx: &RequestContext) -> Result<TweetNode, ResolveError> {
        let tweet = ctx.tweet(&self.favorite.tweet_id).await?;
        TweetNode::with_count(tweet, ctx).await
    }
}

/// A suggestion, passed through untouched
#[derive(Debug, Clone)]
pub struct SuggestionNode {
    pub suggestion: Arc<DbSuggestion>,
}

impl SuggestionNode {
    pub fn new(suggestion: Arc<DbSuggestion>) -> Self {
        Self { suggestion }
    }

    pub fn shape(&self) -> SuggestionShape {
        suggestion_transform(&self.suggestion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolverSettings;
    use feedstore::MemoryDb;

    fn context(db: MemoryDb) -> RequestContext {
        RequestContext::new(Arc::new(db), ResolverSettings::default())
    }

    #[tokio::test]
    async fn test_favorite_relations_resolve_independently() {
        let ctx = context(
            MemoryDb::builder()
                .user(DbUser::new("u1", "ada", "Ada"))
                .tweet(DbTweet::new("t1", "u1", "hello"))
                .favorite(DbFavorite::new("f1", "t1", "u1"))
                .favorite(DbFavorite::new("f2", "t404", "u1"))
                .build(),
        );

        let good = FavoriteNode::new(Arc::new(DbFavorite::new("f1", "t1", "u1")));
        let tweet = good.tweet(&ctx).await.unwrap();
        assert_eq!(tweet.favorite_count, 1);
        assert_eq!(good.user(&ctx).await.unwrap().user.handle, "ada");

        let dangling = FavoriteNode::new(Arc::new(DbFavorite::new("f2", "t404", "u1")));
        assert_eq!(
            dangling.tweet(&ctx).await.unwrap_err(),
            ResolveError::integrity("tweet", "t404")
        );
        assert!(dangling.user(&ctx).await.is_ok());
    }

    #[tokio::test]
    async fn test_user_stats() {
        let ctx = context(
            MemoryDb::builder()
                .user(DbUser::new("u1", "ada", "Ada"))
                .tweet(DbTweet::new("t1", "u1", "one"))
                .tweet(DbTweet::new("t2", "u1", "two"))
                .favorite(DbFavorite::new("f1", "t1", "u2"))
                .build(),
        );

        let node = UserNode::new(Arc::new(DbUser::new("u1", "ada", "Ada")));
        let stats = node.stats(&ctx).await.unwrap();
        assert_eq!(stats.tweet_count, 2);
        assert_eq!(stats.favorite_count, 0);
    }
}
