//! Aggregation builder
//!
//! Derives per-entity counts by folding over full-table scans. Results are
//! memoized per request by [`crate::resolver::RequestContext`].

mod tally;

pub use tally::{
    favorite_counts, favorites_given, tweet_counts, FavoriteCounts, FavoritesGiven, Tally,
    TweetCounts,
};
