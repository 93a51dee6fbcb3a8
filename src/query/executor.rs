//! Selection-set execution with field-level error boundaries
//!
//! Sibling fields and list items are driven concurrently with `join_all` on
//! the calling task, so resolvers interleave at store awaits without running
//! in parallel. A failed field records an error at its path and becomes
//! null; if the schema says it cannot be null, the null moves up to the
//! nearest nullable ancestor, or to `data` itself.

use super::response::{FieldError, Response, ResponsePath};
use super::schema::{FieldDef, ObjectType};
use super::selection::{Field, SelectionSet};
use crate::metrics;
use crate::resolver::{
    root, FavoriteNode, RequestContext, ResolveError, SuggestionNode, TweetNode, UserNode,
};
use crate::transform::UserStatsShape;
use futures::future::{join_all, BoxFuture, FutureExt};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Mutex;

/// Anything a selection can be applied to
#[derive(Debug, Clone)]
enum Node {
    Root,
    User(UserNode),
    UserStats(UserStatsShape),
    Tweet(TweetNode),
    Favorite(FavoriteNode),
    Suggestion(SuggestionNode),
}

/// What a field resolver hands back before sub-selection
enum Resolved {
    Scalar(Value),
    Object(Node),
    List(Vec<Node>),
}

/// A null that could not stop at this field and must move to the parent
#[derive(Debug, Clone, Copy)]
struct NullBubble;

/// Execute a validated selection against the query root
pub async fn execute(ctx: &RequestContext, selection: &SelectionSet) -> Response {
    let execution = Execution {
        ctx,
        errors: Mutex::new(Vec::new()),
    };

    let data = execution
        .execute_selection(&Node::Root, ObjectType::Query, selection, ResponsePath::root())
        .await
        .ok()
        .map(Value::Object);

    let errors = execution
        .errors
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    Response { data, errors }
}

struct Execution<'a> {
    ctx: &'a RequestContext,
    errors: Mutex<Vec<FieldError>>,
}

impl<'a> Execution<'a> {
    fn record(&self, path: ResponsePath, err: &ResolveError) {
        tracing::warn!(path = %path, kind = err.kind(), error = %err, "Field resolution failed");
        metrics::record_field_error(err.kind());
        self.errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(FieldError::new(path, err));
    }

    fn execute_selection<'b>(
        &'b self,
        node: &'b Node,
        ty: ObjectType,
        set: &'b SelectionSet,
        path: ResponsePath,
    ) -> BoxFuture<'b, Result<Map<String, Value>, NullBubble>> {
        async move {
            let fields = set.fields().iter().map(|field| {
                let path = path.key(field.response_key());
                async move { (field, self.execute_field(node, ty, field, path).await) }
            });

            let mut object = Map::new();
            for (field, value) in join_all(fields).await {
                object.insert(field.response_key().to_string(), value?);
            }
            Ok(object)
        }
        .boxed()
    }

    async fn execute_field(
        &self,
        node: &Node,
        ty: ObjectType,
        field: &Field,
        path: ResponsePath,
    ) -> Result<Value, NullBubble> {
        let Some(def) = ty.field(&field.name) else {
            let err = ResolveError::Internal(format!("{} has no field '{}'", ty, field.name));
            self.record(path, &err);
            return Err(NullBubble);
        };

        let outcome = match resolve_field(self.ctx, node, &field.name).await {
            Ok(resolved) => self.complete(def, field, resolved, path.clone()).await,
            Err(err) => {
                self.record(path, &err);
                Err(NullBubble)
            }
        };

        match outcome {
            Err(NullBubble) if def.nullable => Ok(Value::Null),
            other => other,
        }
    }

    async fn complete(
        &self,
        def: &FieldDef,
        field: &Field,
        resolved: Resolved,
        path: ResponsePath,
    ) -> Result<Value, NullBubble> {
        let nested = def.kind.object_type().zip(field.selection.as_ref());

        match (resolved, nested) {
            (Resolved::Scalar(value), _) => Ok(value),
            (Resolved::Object(node), Some((ty, set))) => self
                .execute_selection(&node, ty, set, path)
                .await
                .map(Value::Object),
            (Resolved::List(nodes), Some((ty, set))) => {
                let items = nodes.iter().enumerate().map(|(index, node)| {
                    self.execute_selection(node, ty, set, path.index(index))
                });
                // List items are non-null: one bubbling item nulls the list
                join_all(items)
                    .await
                    .into_iter()
                    .map(|item| item.map(Value::Object))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            (_, None) => {
                let err = ResolveError::Internal(format!(
                    "field '{}' resolved to an object but has no selection",
                    field.name
                ));
                self.record(path, &err);
                Err(NullBubble)
            }
        }
    }
}

/// Serialize a shape and pull one scalar out of it
fn scalar<S: Serialize>(shape: &S, name: &str) -> Result<Resolved, ResolveError> {
    let value = serde_json::to_value(shape)
        .map_err(|e| ResolveError::Internal(format!("failed to serialize shape: {}", e)))?;
    value
        .get(name)
        .cloned()
        .map(Resolved::Scalar)
        .ok_or_else(|| ResolveError::Internal(format!("shape has no scalar '{}'", name)))
}

/// Dispatch one field of `node` to its resolver
async fn resolve_field(
    ctx: &RequestContext,
    node: &Node,
    name: &str,
) -> Result<Resolved, ResolveError> {
    match (node, name) {
        (Node::Root, "currentUser") => {
            root::current_user(ctx).await.map(|u| Resolved::Object(Node::User(u)))
        }
        (Node::Root, "tweets") => root::tweets(ctx)
            .await
            .map(|nodes| Resolved::List(nodes.into_iter().map(Node::Tweet).collect())),
        (Node::Root, "favorites") => root::favorites(ctx)
            .await
            .map(|nodes| Resolved::List(nodes.into_iter().map(Node::Favorite).collect())),
        (Node::Root, "suggestions") => root::suggestions(ctx)
            .await
            .map(|nodes| Resolved::List(nodes.into_iter().map(Node::Suggestion).collect())),
        (Node::Root, other) => Err(ResolveError::Internal(format!(
            "Query has no field '{}'",
            other
        ))),

        (Node::User(user), "stats") => user
            .stats(ctx)
            .await
            .map(|stats| Resolved::Object(Node::UserStats(stats))),
        (Node::User(user), field) => scalar(&user.shape(), field),

        (Node::UserStats(stats), field) => scalar(stats, field),

        (Node::Tweet(tweet), "author") => tweet
            .author(ctx)
            .await
            .map(|u| Resolved::Object(Node::User(u))),
        (Node::Tweet(tweet), field) => scalar(&tweet.shape(), field),

        (Node::Favorite(favorite), "user") => favorite
            .user(ctx)
            .await
            .map(|u| Resolved::Object(Node::User(u))),
        (Node::Favorite(favorite), "tweet") => favorite
            .tweet(ctx)
            .await
            .map(|t| Resolved::Object(Node::Tweet(t))),
        (Node::Favorite(favorite), field) => scalar(&favorite.shape(), field),

        (Node::Suggestion(suggestion), field) => scalar(&suggestion.shape(), field),
    }
}
