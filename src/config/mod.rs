//! Configuration system
//!
//! Loads ~/.config/feedgraph/config.yaml with settings for:
//! - The record store snapshot location
//! - Per-request resolution (timeout, user-cache warming)
//! - Viewer selection for "currentUser"
//! - Response rendering

mod feedgraph_config;
pub mod validation;

pub use feedgraph_config::{
    FeedGraphConfig, OutputConfig, RequestConfig, StoreConfig, ViewerConfig,
};
pub use validation::{validate_config, validate_config_result, ValidationError};
