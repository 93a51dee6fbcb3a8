//! Record-to-shape transforms
//!
//! Each transform maps one normalized store record to its public shape. The
//! shapes carry scalar and timestamp fields only; anything that needs another
//! entity (a tweet's author, a favorite's user or tweet) is left to the
//! relation resolvers in [`crate::resolver`].

use chrono::{DateTime, Utc};
use feedstore::{DbFavorite, DbSuggestion, DbTweet, DbUser, FavoriteId, TweetId, UserId};
use serde::Serialize;

/// Public user shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserShape {
    pub id: UserId,
    pub handle: String,
    pub name: String,
    pub avatar_url: String,
    pub cover_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public tweet shape, minus `author`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetShape {
    pub id: TweetId,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tweet shape plus the derived favorite count
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicTweet {
    #[serde(flatten)]
    pub base: TweetShape,
    pub favorite_count: u64,
}

/// Public favorite shape, minus `user` and `tweet`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteShape {
    pub id: FavoriteId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public suggestion shape; suggestions pass through unchanged
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionShape {
    pub name: String,
    pub handle: String,
    pub avatar_url: String,
    pub reason: String,
}

/// Derived per-user statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsShape {
    pub tweet_count: u64,
    pub favorite_count: u64,
}

pub fn user_transform(u: &DbUser) -> UserShape {
    UserShape {
        id: u.id.clone(),
        handle: u.handle.clone(),
        name: u.name.clone(),
        avatar_url: u.avatar_url.clone(),
        cover_url: u.cover_url.clone(),
        created_at: u.created_at,
        updated_at: u.updated_at,
    }
}

pub fn tweet_transform(t: &DbTweet) -> TweetShape {
    TweetShape {
        id: t.id.clone(),
        body: t.message.clone(),
        created_at: t.created_at,
        updated_at: t.updated_at,
    }
}

pub fn favorite_transform(f: &DbFavorite) -> FavoriteShape {
    FavoriteShape {
        id: f.id.clone(),
        created_at: f.created_at,
        updated_at: f.updated_at,
    }
}

pub fn suggestion_transform(s: &DbSuggestion) -> SuggestionShape {
    SuggestionShape {
        name: s.name.clone(),
        handle: s.handle.clone(),
        avatar_url: s.avatar_url.clone(),
        reason: s.reason.clone(),
    }
}
