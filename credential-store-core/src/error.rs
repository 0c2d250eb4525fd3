//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// The backend could not be reached or opened
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Post-connect setup or table creation failed
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// A runtime statement failed
    #[error("Query error: {0}")]
    QueryError(String),

    /// Caller asked for a scalar type the store cannot read
    #[error("Unsupported return type: {0}")]
    UnsupportedType(String),

    /// `database.type` names no known backend
    #[error("Unsupported database type: {0}")]
    UnsupportedBackend(String),

    /// Malformed or unreadable configuration
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Encryption gateway failure
    #[error("Crypto error: {0}")]
    CryptoError(String),
}

impl CoreError {
    /// Whether it is expected behavior (caller input, configuration typos) used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::UnsupportedType(_)
            | Self::UnsupportedBackend(_)
            | Self::ConfigurationError(_)
            | Self::QueryError(_) => true,
            Self::ConnectionError(_) | Self::SchemaError(_) | Self::CryptoError(_) => false,
        }
    }

    /// Whether the error happened while bringing the store up.
    ///
    /// These abort initialization; the host should disable whatever depends on the store.
    #[must_use]
    pub fn is_setup_failure(&self) -> bool {
        matches!(
            self,
            Self::ConnectionError(_)
                | Self::SchemaError(_)
                | Self::UnsupportedBackend(_)
                | Self::ConfigurationError(_)
        )
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_failures_are_classified() {
        assert!(CoreError::ConnectionError("refused".into()).is_setup_failure());
        assert!(CoreError::SchemaError("no table".into()).is_setup_failure());
        assert!(CoreError::UnsupportedBackend("oracle".into()).is_setup_failure());
        assert!(!CoreError::QueryError("syntax".into()).is_setup_failure());
        assert!(!CoreError::UnsupportedType("uuid".into()).is_setup_failure());
    }

    #[test]
    fn serializes_with_code_tag() {
        let err = CoreError::UnsupportedType("uuid".into());
        let json = toml::Value::try_from(&err).unwrap();
        assert_eq!(json.get("code").and_then(|v| v.as_str()), Some("UnsupportedType"));
        assert_eq!(json.get("details").and_then(|v| v.as_str()), Some("uuid"));
    }

    #[test]
    fn display_includes_detail() {
        let err = CoreError::UnsupportedBackend("oracle".into());
        assert_eq!(err.to_string(), "Unsupported database type: oracle");
    }
}
