//! Static schema of the feed graph
//!
//! ```text
//! type Query      { currentUser: User!  tweets: [Tweet!]!  favorites: [Favorite!]!  suggestions: [Suggestion!]! }
//! type User       { id handle name avatarUrl coverUrl createdAt updatedAt: String!  stats: UserStats }
//! type UserStats  { tweetCount favoriteCount: Int! }
//! type Tweet      { id body createdAt updatedAt: String!  favoriteCount: Int!  author: User }
//! type Favorite   { id createdAt updatedAt: String!  user: User  tweet: Tweet }
//! type Suggestion { name handle avatarUrl reason: String! }
//! ```

use super::selection::SelectionSet;
use crate::{FeedGraphError, Result};
use std::collections::HashSet;
use std::fmt;

/// Object types that can be selected into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Query,
    User,
    UserStats,
    Tweet,
    Favorite,
    Suggestion,
}

/// What a field produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar,
    Object(ObjectType),
    List(ObjectType),
}

impl FieldKind {
    /// Object type behind an object or list field
    pub fn object_type(self) -> Option<ObjectType> {
        match self {
            FieldKind::Scalar => None,
            FieldKind::Object(ty) | FieldKind::List(ty) => Some(ty),
        }
    }
}

/// One field of an object type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Whether a failure here may become null instead of nulling the parent
    pub nullable: bool,
}

impl FieldDef {
    const fn scalar(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Scalar,
            nullable: false,
        }
    }

    const fn relation(name: &'static str, ty: ObjectType) -> Self {
        Self {
            name,
            kind: FieldKind::Object(ty),
            nullable: true,
        }
    }

    const fn required(name: &'static str, ty: ObjectType) -> Self {
        Self {
            name,
            kind: FieldKind::Object(ty),
            nullable: false,
        }
    }

    const fn list(name: &'static str, ty: ObjectType) -> Self {
        Self {
            name,
            kind: FieldKind::List(ty),
            nullable: false,
        }
    }
}

const QUERY_FIELDS: &[FieldDef] = &[
    FieldDef::required("currentUser", ObjectType::User),
    FieldDef::list("tweets", ObjectType::Tweet),
    FieldDef::list("favorites", ObjectType::Favorite),
    FieldDef::list("suggestions", ObjectType::Suggestion),
];

const USER_FIELDS: &[FieldDef] = &[
    FieldDef::scalar("id"),
    FieldDef::scalar("handle"),
    FieldDef::scalar("name"),
    FieldDef::scalar("avatarUrl"),
    FieldDef::scalar("coverUrl"),
    FieldDef::scalar("createdAt"),
    FieldDef::scalar("updatedAt"),
    FieldDef::relation("stats", ObjectType::UserStats),
];

const USER_STATS_FIELDS: &[FieldDef] = &[
    FieldDef::scalar("tweetCount"),
    FieldDef::scalar("favoriteCount"),
];

const TWEET_FIELDS: &[FieldDef] = &[
    FieldDef::scalar("id"),
    FieldDef::scalar("body"),
    FieldDef::scalar("createdAt"),
    FieldDef::scalar("updatedAt"),
    FieldDef::scalar("favoriteCount"),
    FieldDef::relation("author", ObjectType::User),
];

const FAVORITE_FIELDS: &[FieldDef] = &[
    FieldDef::scalar("id"),
    FieldDef::scalar("createdAt"),
    FieldDef::scalar("updatedAt"),
    FieldDef::relation("user", ObjectType::User),
    FieldDef::relation("tweet", ObjectType::Tweet),
];

const SUGGESTION_FIELDS: &[FieldDef] = &[
    FieldDef::scalar("name"),
    FieldDef::scalar("handle"),
    FieldDef::scalar("avatarUrl"),
    FieldDef::scalar("reason"),
];

impl ObjectType {
    pub fn name(self) -> &'static str {
        match self {
            ObjectType::Query => "Query",
            ObjectType::User => "User",
            ObjectType::UserStats => "UserStats",
            ObjectType::Tweet => "Tweet",
            ObjectType::Favorite => "Favorite",
            ObjectType::Suggestion => "Suggestion",
        }
    }

    pub fn fields(self) -> &'static [FieldDef] {
        match self {
            ObjectType::Query => QUERY_FIELDS,
            ObjectType::User => USER_FIELDS,
            ObjectType::UserStats => USER_STATS_FIELDS,
            ObjectType::Tweet => TWEET_FIELDS,
            ObjectType::Favorite => FAVORITE_FIELDS,
            ObjectType::Suggestion => SUGGESTION_FIELDS,
        }
    }

    pub fn field(self, name: &str) -> Option<&'static FieldDef> {
        self.fields().iter().find(|f| f.name == name)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Check a selection set against the schema, starting at `ty`
///
/// Runs before execution; a query that fails here is rejected whole.
pub fn validate(ty: ObjectType, set: &SelectionSet) -> Result<()> {
    if set.is_empty() {
        return Err(FeedGraphError::InvalidQuery(format!(
            "Selection on type {} must not be empty",
            ty
        )));
    }

    let mut keys = HashSet::new();
    for field in set.fields() {
        let def = ty.field(&field.name).ok_or_else(|| {
            FeedGraphError::InvalidQuery(format!(
                "Cannot query field '{}' on type {}",
                field.name, ty
            ))
        })?;

        if !keys.insert(field.response_key()) {
            return Err(FeedGraphError::InvalidQuery(format!(
                "Response key '{}' appears more than once on type {}",
                field.response_key(),
                ty
            )));
        }

        match (def.kind.object_type(), &field.selection) {
            (None, Some(_)) => {
                return Err(FeedGraphError::InvalidQuery(format!(
                    "Field '{}' on type {} is a scalar and cannot have a selection",
                    field.name, ty
                )));
            }
            (Some(child), None) => {
                return Err(FeedGraphError::InvalidQuery(format!(
                    "Field '{}' on type {} returns {} and needs a selection",
                    field.name, ty, child
                )));
            }
            (Some(child), Some(selection)) => validate(child, selection)?,
            (None, None) => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relations_are_nullable() {
        assert!(ObjectType::Tweet.field("author").unwrap().nullable);
        assert!(ObjectType::Favorite.field("user").unwrap().nullable);
        assert!(ObjectType::Favorite.field("tweet").unwrap().nullable);
        assert!(!ObjectType::Query.field("currentUser").unwrap().nullable);
        assert!(!ObjectType::Tweet.field("favoriteCount").unwrap().nullable);
    }

    #[test]
    fn test_validate_accepts_nested_selection() {
        let set = SelectionSet::parse("{tweets: {id: ~, favoriteCount: ~, author: [handle]}}").unwrap();
        assert!(validate(ObjectType::Query, &set).is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_field() {
        let set = SelectionSet::parse("{tweets: {retweets: ~}}").unwrap();
        let err = validate(ObjectType::Query, &set).unwrap_err();
        assert!(err.to_string().contains("Cannot query field 'retweets' on type Tweet"));
    }

    #[test]
    fn test_validate_rejects_missing_subselection() {
        let set = SelectionSet::parse("{currentUser: ~}").unwrap();
        assert!(matches!(
            validate(ObjectType::Query, &set),
            Err(FeedGraphError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_validate_rejects_scalar_subselection() {
        let set = SelectionSet::parse("{tweets: {body: {length: ~}}}").unwrap();
        assert!(validate(ObjectType::Query, &set).is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_response_key() {
        let set = SelectionSet::parse("{tweets: {id: ~, \"id: body\": ~}}").unwrap();
        assert!(validate(ObjectType::Query, &set).is_err());
    }
}
