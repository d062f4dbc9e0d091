//! Error types for Ascent.

use thiserror::Error;

/// Top-level error type for Ascent operations.
#[derive(Debug, Error)]
pub enum AscentError {
    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration loading and saving errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration text could not be parsed
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// The configuration could not be encoded
    #[error("Failed to encode config: {0}")]
    Encode(String),
}

/// Result type alias for Ascent operations.
pub type AscentResult<T> = Result<T, AscentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_wraps() {
        let err: AscentError = ConfigError::Parse("expected a table".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Config error: Failed to parse config: expected a table"
        );
    }
}
