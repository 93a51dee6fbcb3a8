//! Field-level resolution failures

use thiserror::Error;

/// Why a single field could not be resolved
///
/// These stop at the field that raised them; sibling fields keep resolving.
/// A cache miss is not in here: it is `None` from the cache and a cue to
/// scan the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A referenced id has no record in the cache or the store
    #[error("{entity} '{id}' is referenced but does not exist")]
    Integrity { entity: &'static str, id: String },

    /// A field that must return one entity found no candidate
    #[error("{field} has no {entity} to return: {reason}")]
    EmptyDataset {
        field: &'static str,
        entity: &'static str,
        reason: String,
    },

    /// The store failed to serve a scan
    #[error("store scan failed: {0}")]
    Store(String),

    /// The resolver was asked for something the schema does not define
    #[error("internal resolution error: {0}")]
    Internal(String),
}

impl ResolveError {
    pub fn integrity(entity: &'static str, id: impl ToString) -> Self {
        Self::Integrity {
            entity,
            id: id.to_string(),
        }
    }

    /// Short machine-readable label, used in responses and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::Integrity { .. } => "integrity",
            ResolveError::EmptyDataset { .. } => "empty_dataset",
            ResolveError::Store(_) => "store",
            ResolveError::Internal(_) => "internal",
        }
    }
}

impl From<feedstore::Error> for ResolveError {
    fn from(err: feedstore::Error) -> Self {
        ResolveError::Store(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrity_message() {
        let err = ResolveError::integrity("user", "u9");
        assert_eq!(err.to_string(), "user 'u9' is referenced but does not exist");
        assert_eq!(err.kind(), "integrity");
    }

    #[test]
    fn test_store_conversion() {
        let err: ResolveError = feedstore::Error::Unavailable("offline".into()).into();
        assert_eq!(err.kind(), "store");
        assert!(err.to_string().contains("offline"));
    }
}
