//! Request entry point: validate, execute under a deadline, report

use super::executor::execute;
use super::response::Response;
use super::schema::{validate, ObjectType};
use super::selection::SelectionSet;
use crate::config::{validate_config_result, FeedGraphConfig};
use crate::metrics;
use crate::resolver::{RequestContext, ResolverSettings};
use crate::{FeedGraphError, Result};
use feedstore::Db;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Runs queries against one store
///
/// The engine itself holds no per-request state. Every call to [`run`]
/// gets a fresh [`RequestContext`] that is dropped when the call returns,
/// so nothing cached for one query is visible to the next.
///
/// [`run`]: QueryEngine::run
#[derive(Clone)]
pub struct QueryEngine {
    db: Arc<dyn Db>,
    settings: ResolverSettings,
    timeout: Duration,
}

impl QueryEngine {
    pub fn new(db: Arc<dyn Db>, settings: ResolverSettings, timeout: Duration) -> Self {
        Self {
            db,
            settings,
            timeout,
        }
    }

    /// Build an engine from a validated configuration
    ///
    /// Fails with a config error listing every problem, e.g. a zero timeout.
    pub fn from_config(db: Arc<dyn Db>, config: &FeedGraphConfig) -> Result<Self> {
        validate_config_result(config)?;
        Ok(Self::new(
            db,
            ResolverSettings::from(config),
            config.request.timeout(),
        ))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// A new, empty context for one request
    pub fn context(&self) -> RequestContext {
        RequestContext::new(self.db.clone(), self.settings.clone())
    }

    /// Parse and run a YAML or JSON query document
    pub async fn run_str(&self, query: &str) -> Result<Response> {
        let selection = SelectionSet::parse(query)?;
        self.run(&selection).await
    }

    /// Run one query
    ///
    /// Field failures are reported inside the [`Response`]. An `Err` here
    /// means nothing was returned at all: the query did not fit the schema,
    /// or it ran past the configured timeout and was cancelled.
    pub async fn run(&self, selection: &SelectionSet) -> Result<Response> {
        validate(ObjectType::Query, selection)?;

        let ctx = self.context();
        let started = Instant::now();
        let outcome = tokio::time::timeout(self.timeout, execute(&ctx, selection)).await;
        let elapsed = started.elapsed();
        metrics::record_request_duration(elapsed.as_secs_f64());

        match outcome {
            Ok(response) => {
                let users = ctx.user_cache_stats();
                let tweets = ctx.tweet_cache_stats();
                tracing::info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    errors = response.errors.len(),
                    user_hits = users.hits,
                    user_misses = users.misses,
                    tweet_hits = tweets.hits,
                    tweet_misses = tweets.misses,
                    "Query completed"
                );
                Ok(response)
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Query timed out, in-flight resolvers dropped"
                );
                Err(FeedGraphError::Timeout(self.timeout))
            }
        }
    }
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine")
            .field("settings", &self.settings)
            .field("timeout", &self.timeout)
            .finish()
    }
}
