//! Configuration validation
//!
//! Collects every problem at once instead of stopping at the first.

use super::feedgraph_config::FeedGraphConfig;

/// Validation error details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// Validate a feedgraph configuration
pub fn validate_config(config: &FeedGraphConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if config.store.path.as_os_str().is_empty() {
        errors.push(ValidationError::new("store.path", "Store path cannot be empty"));
    }

    if config.request.timeout_ms == 0 {
        errors.push(ValidationError::new(
            "request.timeout_ms",
            "Timeout must be greater than 0",
        ));
    }

    if let Some(handle) = &config.viewer.handle {
        if handle.trim().is_empty() {
            errors.push(ValidationError::new(
                "viewer.handle",
                "Viewer handle cannot be blank; remove it to use the first user",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate and fold all problems into one config error
pub fn validate_config_result(config: &FeedGraphConfig) -> crate::Result<()> {
    validate_config(config).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        crate::FeedGraphError::Config(format!(
            "Configuration validation failed:\n  {}",
            messages.join("\n  ")
        ))
    })
}
