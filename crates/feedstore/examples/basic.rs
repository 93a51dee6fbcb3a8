//! Basic usage example for the feedstore crate
//!
//! Loads a JSON snapshot and prints what each table holds, then joins
//! tweets to their authors by hand the way a caller without a cache would.
//!
//! To run this example:
//! ```sh
//! cd crates/feedstore
//! cargo run --example basic -- ../../demos/db.json
//! ```

use feedstore::{Db, MemoryDb, Result};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "db.json".to_string());

    println!("Feedstore Example\n");

    let db = match MemoryDb::load(&path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("\nPass the path to a snapshot, e.g. demos/db.json.");
            return Err(e);
        }
    };

    let users = db.list_users().await?;
    let tweets = db.list_tweets().await?;
    let favorites = db.list_favorites().await?;
    let suggestions = db.list_suggestions().await?;

    println!("=== Snapshot ===");
    println!("Users:       {}", users.len());
    println!("Tweets:      {}", tweets.len());
    println!("Favorites:   {}", favorites.len());
    println!("Suggestions: {}", suggestions.len());

    println!("\n=== Tweets ===");
    for tweet in &tweets {
        let author = users
            .iter()
            .find(|u| u.id == tweet.user_id)
            .map(|u| format!("@{}", u.handle))
            .unwrap_or_else(|| format!("<missing {}>", tweet.user_id));
        let likes = favorites.iter().filter(|f| f.tweet_id == tweet.id).count();
        println!("  {} {}: {} ({} ♥)", tweet.id, author, tweet.message, likes);
    }

    if !suggestions.is_empty() {
        println!("\n=== Who to follow ===");
        for suggestion in &suggestions {
            println!("  @{} - {}", suggestion.handle, suggestion.reason);
        }
    }

    Ok(())
}
