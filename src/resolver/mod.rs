//! Resolution coordinator
//!
//! Field resolvers for the feed schema. Every resolver receives the parent
//! object and the shared [`RequestContext`]; top-level fields populate the
//! caches and aggregates, nested relation fields read them and fall back to
//! the store on a miss.

mod context;
mod error;
mod nodes;
pub mod root;

pub use context::{RequestContext, ResolverSettings, Rows};
pub use error::ResolveError;
pub use nodes::{FavoriteNode, SuggestionNode, TweetNode, UserNode};
