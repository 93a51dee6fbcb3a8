//! Logging configuration using tracing
//!
//! Structured logging to stderr, filtered through RUST_LOG. Stdout is kept
//! free for query responses.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber
///
/// Filtering comes from RUST_LOG and defaults to "warn", so a plain query run
/// prints nothing but the response.
///
/// # Example RUST_LOG values
/// - `RUST_LOG=info` - request lifecycle events
/// - `RUST_LOG=feedgraph=debug` - cache warms, misses and aggregate builds
/// - `RUST_LOG=feedgraph=debug,feedstore=info` - different levels per crate
///
/// # Errors
/// Returns an error if the subscriber has already been initialized
pub fn init() -> crate::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|e| crate::FeedGraphError::Other(format!("Failed to initialize tracing: {}", e)))?;

    Ok(())
}

/// Initialize logging for tests (no-op if already initialized)
pub fn init_test() {
    let _ = init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_helper() {
        init_test();
        init_test();
    }

    #[test]
    fn test_structured_events() {
        init_test();

        tracing::debug!(entity = "user", id = "u1", "cache miss");
        tracing::warn!(path = "tweets.0.author", "field failed");
    }
}
