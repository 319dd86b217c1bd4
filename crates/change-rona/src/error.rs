//! Error types for the change-rona widget

use thiserror::Error;

/// Result type for widget operations
pub type ChangeRonaResult<T> = Result<T, ChangeRonaError>;

/// Result type for calls into the host desktop
pub type HostResult<T> = Result<T, HostError>;

/// Errors that can occur in the widget itself
///
/// Only lifecycle problems surface through this type. Failures of individual
/// host commands are contained where they happen and only logged.
#[derive(Debug, Error)]
pub enum ChangeRonaError {
    /// Host collaborator error
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Invalid lifecycle state
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// Logging could not be installed
    #[error("Logging error: {message}")]
    Logging { message: String },
}

impl ChangeRonaError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create a logging error
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }
}

/// Errors reported by the host desktop runtime
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    /// The host rejected a command
    #[error("{operation} rejected: {reason}")]
    Rejected { operation: String, reason: String },

    /// The host API is not reachable
    #[error("Host unavailable: {message}")]
    Unavailable { message: String },

    /// A UI lookup or click failed
    #[error("DOM error: {message}")]
    Dom { message: String },

    /// An event payload could not be decoded
    #[error("Malformed event payload: {message}")]
    Payload { message: String },
}

impl HostError {
    /// Create a rejected-command error
    pub fn rejected(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a DOM error
    pub fn dom(message: impl Into<String>) -> Self {
        Self::Dom {
            message: message.into(),
        }
    }

    /// Create a payload error
    pub fn payload(message: impl Into<String>) -> Self {
        Self::Payload {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_error_converts_into_widget_error() {
        let err: ChangeRonaError = HostError::rejected("stateChange", "agent logged out").into();
        assert!(matches!(err, ChangeRonaError::Host(HostError::Rejected { .. })));
        assert_eq!(
            err.to_string(),
            "Host error: stateChange rejected: agent logged out"
        );
    }

    #[test]
    fn test_constructors() {
        assert_eq!(
            ChangeRonaError::config("bad").to_string(),
            "Configuration error: bad"
        );
        assert_eq!(
            ChangeRonaError::invalid_state("running").to_string(),
            "Invalid state: running"
        );
        assert_eq!(HostError::dom("boom").to_string(), "DOM error: boom");
    }
}
