//! Query responses and field error positions

use crate::resolver::ResolveError;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// One step in a response path: an object key or a list index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Position of a field in the response, e.g. `["tweets", 0, "author"]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResponsePath(Vec<PathSegment>);

impl ResponsePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl fmt::Display for ResponsePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|segment| match segment {
                PathSegment::Key(key) => key.clone(),
                PathSegment::Index(index) => index.to_string(),
            })
            .collect();
        f.write_str(&parts.join("."))
    }
}

/// A failure attached to the field that raised it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub message: String,
    pub path: ResponsePath,
    pub kind: &'static str,
}

impl FieldError {
    pub fn new(path: ResponsePath, err: &ResolveError) -> Self {
        Self {
            message: err.to_string(),
            path,
            kind: err.kind(),
        }
    }
}

/// Result of one query: partial data plus every field error
///
/// `data` is `None` when a failure bubbled all the way to the root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl Response {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// First error recorded at exactly `path` (dotted, e.g. "tweets.0.author")
    pub fn error_at(&self, path: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.path.to_string() == path)
    }

    /// Walk `data` along a dotted path
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = self.data.as_ref()?;
        for part in path.split('.').filter(|p| !p.is_empty()) {
            current = match part.parse::<usize>() {
                Ok(index) => current.get(index)?,
                Err(_) => current.get(part)?,
            };
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_serializes_mixed_segments() {
        let path = ResponsePath::root().key("tweets").index(0).key("author");
        assert_eq!(serde_json::to_value(&path).unwrap(), json!(["tweets", 0, "author"]));
        assert_eq!(path.to_string(), "tweets.0.author");
    }

    #[test]
    fn test_response_skips_empty_errors() {
        let response = Response {
            data: Some(json!({"tweets": []})),
            errors: vec![],
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"data": {"tweets": []}})
        );
    }

    #[test]
    fn test_response_get() {
        let response = Response {
            data: Some(json!({"tweets": [{"author": {"id": "u1"}}]})),
            errors: vec![],
        };
        assert_eq!(response.get("tweets.0.author.id"), Some(&json!("u1")));
        assert_eq!(response.get("tweets.1"), None);
    }
}
