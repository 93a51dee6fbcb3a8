//! In-memory store backed by a JSON snapshot

use crate::records::{DbFavorite, DbSuggestion, DbTweet, DbUser, Snapshot};
use crate::{Db, Result};
use async_trait::async_trait;
use std::fs;
use std::path::Path;

/// Store that serves scans from an immutable in-memory snapshot
#[derive(Debug, Clone, Default)]
pub struct MemoryDb {
    snapshot: Snapshot,
}

impl MemoryDb {
    /// Wrap an existing snapshot
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Loading store snapshot");

        let content = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;

        tracing::debug!(
            users = snapshot.users.len(),
            tweets = snapshot.tweets.len(),
            favorites = snapshot.favorites.len(),
            suggestions = snapshot.suggestions.len(),
            "Snapshot loaded"
        );

        Ok(Self::new(snapshot))
    }

    /// Start building a store row by row
    pub fn builder() -> MemoryDbBuilder {
        MemoryDbBuilder::default()
    }
}

#[async_trait]
impl Db for MemoryDb {
    async fn list_users(&self) -> Result<Vec<DbUser>> {
        Ok(self.snapshot.users.clone())
    }

    async fn list_tweets(&self) -> Result<Vec<DbTweet>> {
        Ok(self.snapshot.tweets.clone())
    }

    async fn list_favorites(&self) -> Result<Vec<DbFavorite>> {
        Ok(self.snapshot.favorites.clone())
    }

    async fn list_suggestions(&self) -> Result<Vec<DbSuggestion>> {
        Ok(self.snapshot.suggestions.clone())
    }
}

/// Builder for [`MemoryDb`]; rows keep insertion order
#[derive(Debug, Default)]
pub struct MemoryDbBuilder {
    snapshot: Snapshot,
}

impl MemoryDbBuilder {
    pub fn user(mut self, user: DbUser) -> Self {
        self.snapshot.users.push(user);
        self
    }

    pub fn tweet(mut self, tweet: DbTweet) -> Self {
        self.snapshot.tweets.push(tweet);
        self
    }

    pub fn favorite(mut self, favorite: DbFavorite) -> Self {
        self.snapshot.favorites.push(favorite);
        self
    }

    pub fn suggestion(mut self, suggestion: DbSuggestion) -> Self {
        self.snapshot.suggestions.push(suggestion);
        self
    }

    pub fn build(self) -> MemoryDb {
        MemoryDb::new(self.snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_builder_preserves_order() {
        let db = MemoryDb::builder()
            .user(DbUser::new("u2", "grace", "Grace"))
            .user(DbUser::new("u1", "ada", "Ada"))
            .build();

        let users = db.list_users().await.unwrap();
        let ids: Vec<_> = users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u2", "u1"]);
    }

    #[tokio::test]
    async fn test_load_snapshot_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "users": [{{"id": "u1", "handle": "ada", "name": "Ada",
                    "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"}}],
                "tweets": [{{"id": "t1", "message": "hi", "userId": "u1",
                    "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"}}],
                "suggestions": [{{"name": "Grace", "handle": "grace", "reason": "popular"}}]
            }}"#
        )
        .unwrap();

        let db = MemoryDb::load(file.path()).unwrap();
        assert_eq!(db.list_users().await.unwrap().len(), 1);
        assert_eq!(db.list_tweets().await.unwrap().len(), 1);
        assert!(db.list_favorites().await.unwrap().is_empty());
        assert_eq!(db.list_suggestions().await.unwrap()[0].reason, "popular");
    }

    #[test]
    fn test_load_missing_file() {
        let result = MemoryDb::load("/nonexistent/db.json");
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let result = MemoryDb::load(file.path());
        assert!(matches!(result, Err(crate::Error::Json(_))));
    }
}
