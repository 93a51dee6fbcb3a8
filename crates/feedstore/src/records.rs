//! Normalized store records
//!
//! Rows hold ids, never embedded objects. Field names follow the JSON
//! snapshot format (camelCase), so a tweet's author is `userId` and its
//! text is `message`.

use crate::ids::{FavoriteId, TweetId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row in the users table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbUser {
    pub id: UserId,
    pub handle: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub cover_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbUser {
    /// Create a user with both timestamps set to now
    pub fn new(id: impl Into<UserId>, handle: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            handle: handle.into(),
            name: name.into(),
            avatar_url: String::new(),
            cover_url: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A row in the tweets table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbTweet {
    pub id: TweetId,
    pub message: String,
    /// Author of the tweet
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbTweet {
    /// Create a tweet with both timestamps set to now
    pub fn new(
        id: impl Into<TweetId>,
        author: impl Into<UserId>,
        message: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            message: message.into(),
            user_id: author.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A row in the favorites join table (user favorited tweet)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbFavorite {
    pub id: FavoriteId,
    pub tweet_id: TweetId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbFavorite {
    /// Create a favorite with both timestamps set to now
    pub fn new(
        id: impl Into<FavoriteId>,
        tweet_id: impl Into<TweetId>,
        user_id: impl Into<UserId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            tweet_id: tweet_id.into(),
            user_id: user_id.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A "who to follow" recommendation; opaque to everything above the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbSuggestion {
    pub name: String,
    pub handle: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub reason: String,
}

/// The full contents of a store, as laid out in a JSON snapshot file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<DbUser>,
    #[serde(default)]
    pub tweets: Vec<DbTweet>,
    #[serde(default)]
    pub favorites: Vec<DbFavorite>,
    #[serde(default)]
    pub suggestions: Vec<DbSuggestion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tweet_deserialize() {
        let json = r#"{
            "id": "t1",
            "message": "hello world",
            "userId": "u1",
            "createdAt": "2024-01-01T12:00:00Z",
            "updatedAt": "2024-01-01T12:00:00Z"
        }"#;
        let tweet: DbTweet = serde_json::from_str(json).unwrap();
        assert_eq!(tweet.id.as_str(), "t1");
        assert_eq!(tweet.user_id.as_str(), "u1");
        assert_eq!(tweet.message, "hello world");
    }

    #[test]
    fn test_user_defaults_optional_urls() {
        let json = r#"{
            "id": "u1",
            "handle": "ada",
            "name": "Ada",
            "createdAt": "2024-01-01T12:00:00Z",
            "updatedAt": "2024-01-02T12:00:00Z"
        }"#;
        let user: DbUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.avatar_url, "");
        assert_eq!(user.cover_url, "");
    }

    #[test]
    fn test_snapshot_missing_tables() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"users": []}"#).unwrap();
        assert!(snapshot.tweets.is_empty());
        assert!(snapshot.favorites.is_empty());
        assert!(snapshot.suggestions.is_empty());
    }
}
