//! Error types for registration and configuration

use crate::category::Category;
use thiserror::Error;

/// Errors raised by the bus itself.
///
/// Listener failures are not wrapped here: they travel through
/// [`EventBus::post`](crate::EventBus::post) as the `anyhow::Error` the
/// listener returned.
#[derive(Debug, Error)]
pub enum BusError {
    /// A configuration or registration value the bus cannot accept
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Registration would exceed the per-category listener limit
    #[error("listener limit of {limit} reached for {category}")]
    ListenerLimit { category: Category, limit: usize },

    /// A listener was handed an event of another type
    #[error("listener for {expected} received an event of a different type")]
    CategoryMismatch { expected: Category },

    /// Config text could not be parsed
    #[error("failed to parse bus config: {0}")]
    Config(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;

    #[test]
    fn test_listener_limit_message_names_category() {
        let err = BusError::ListenerLimit {
            category: Category::of::<Ping>(),
            limit: 3,
        };
        let msg = err.to_string();
        
        assert!(msg.contains("limit of 3"));
        assert!(msg.contains("Ping"));
    }
}
