//! Type-safe ID wrappers for store records
//!
//! Each table gets its own id type so a tweet id can never be handed to a
//! user lookup. All three serialize as plain strings.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new id from anything string-like
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

record_id!(
    /// Id of a row in the users table (e.g., "u1")
    UserId
);

record_id!(
    /// Id of a row in the tweets table (e.g., "t1")
    TweetId
);

record_id!(
    /// Id of a row in the favorites join table (e.g., "f1")
    FavoriteId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = UserId::new("u1");
        assert_eq!(id.as_str(), "u1");
        assert_eq!(id.to_string(), "u1");
    }

    #[test]
    fn test_id_serializes_as_string() {
        let id = TweetId::from("t42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"t42\"");

        let back: TweetId = serde_json::from_str("\"t42\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_type_safety() {
        fn takes_user(_id: &UserId) {}
        fn takes_tweet(_id: &TweetId) {}

        takes_user(&UserId::new("same"));
        takes_tweet(&TweetId::new("same"));
    }
}
