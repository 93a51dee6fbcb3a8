//! Counting fold over join-table scans

use feedstore::{DbFavorite, DbTweet, TweetId, UserId};
use std::collections::HashMap;
use std::hash::Hash;

/// Per-key counts produced by one pass over a record set
///
/// A key that never appeared counts as zero; lookups never fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally<K: Eq + Hash> {
    counts: HashMap<K, u64>,
}

impl<K: Eq + Hash> Default for Tally<K> {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> Tally<K> {
    /// Fold `records` into counts keyed by `key_fn`
    ///
    /// O(records) time, O(distinct keys) memory. Summation is commutative so
    /// record order does not matter.
    pub fn fold<'a, R, I, F>(records: I, key_fn: F) -> Self
    where
        R: 'a,
        I: IntoIterator<Item = &'a R>,
        F: Fn(&R) -> &K,
    {
        let counts = records.into_iter().fold(HashMap::new(), |mut acc, record| {
            *acc.entry(key_fn(record).clone()).or_insert(0) += 1;
            acc
        });
        Self { counts }
    }
}

impl<K: Eq + Hash> Tally<K> {
    /// Count for `key`, 0 if absent
    pub fn count(&self, key: &K) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct keys seen
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts (equals the number of folded records)
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Favorites received per tweet
pub type FavoriteCounts = Tally<TweetId>;

/// Tweets authored per user
pub type TweetCounts = Tally<UserId>;

/// Favorites given per user
pub type FavoritesGiven = Tally<UserId>;

/// Count favorites by the tweet they point at
pub fn favorite_counts<'a>(favorites: impl IntoIterator<Item = &'a DbFavorite>) -> FavoriteCounts {
    Tally::fold(favorites, |f: &DbFavorite| &f.tweet_id)
}

/// Count tweets by author
pub fn tweet_counts<'a>(tweets: impl IntoIterator<Item = &'a DbTweet>) -> TweetCounts {
    Tally::fold(tweets, |t: &DbTweet| &t.user_id)
}

/// Count favorites by the user who gave them
pub fn favorites_given<'a>(favorites: impl IntoIterator<Item = &'a DbFavorite>) -> FavoritesGiven {
    Tally::fold(favorites, |f: &DbFavorite| &f.user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favorite_counts() {
        let favorites = vec![
            DbFavorite::new("f1", "t1", "u1"),
            DbFavorite::new("f2", "t1", "u2"),
            DbFavorite::new("f3", "t2", "u1"),
        ];

        let counts = favorite_counts(&favorites);
        assert_eq!(counts.count(&TweetId::new("t1")), 2);
        assert_eq!(counts.count(&TweetId::new("t2")), 1);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_missing_key_is_zero() {
        let counts = favorite_counts(&[DbFavorite::new("f1", "t1", "u1")]);
        assert_eq!(counts.count(&TweetId::new("never-favorited")), 0);
    }

    #[test]
    fn test_empty_table_yields_empty_map() {
        let counts = favorite_counts(&Vec::<DbFavorite>::new());
        assert!(counts.is_empty());
        assert_eq!(counts.total(), 0);
        assert_eq!(counts.count(&TweetId::new("t1")), 0);
    }

    #[test]
    fn test_refold_is_idempotent() {
        let favorites = vec![
            DbFavorite::new("f1", "t1", "u1"),
            DbFavorite::new("f2", "t2", "u1"),
        ];
        assert_eq!(favorite_counts(&favorites), favorite_counts(&favorites));
    }

    #[test]
    fn test_order_does_not_matter() {
        let mut favorites = vec![
            DbFavorite::new("f1", "t1", "u1"),
            DbFavorite::new("f2", "t2", "u1"),
            DbFavorite::new("f3", "t1", "u2"),
        ];
        let forward = favorite_counts(&favorites);
        favorites.reverse();
        assert_eq!(forward, favorite_counts(&favorites));
    }

    #[test]
    fn test_user_tallies() {
        let tweets = vec![
            DbTweet::new("t1", "u1", "a"),
            DbTweet::new("t2", "u1", "b"),
            DbTweet::new("t3", "u2", "c"),
        ];
        let favorites = vec![DbFavorite::new("f1", "t3", "u1")];

        assert_eq!(tweet_counts(&tweets).count(&UserId::new("u1")), 2);
        assert_eq!(favorites_given(&favorites).count(&UserId::new("u1")), 1);
        assert_eq!(favorites_given(&favorites).count(&UserId::new("u2")), 0);
    }
}
