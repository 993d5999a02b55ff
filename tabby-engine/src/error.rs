//! Error types for the tabby engine

use thiserror::Error;

/// Main error type for template and request loop operations
#[derive(Debug, Error, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TabbyError {
    #[error("Configuration error: {component} - {reason}")]
    ConfigurationError { component: String, reason: String },

    #[error("Invalid interval '{value}': {reason}")]
    InvalidInterval { value: String, reason: String },

    #[error("Template file unreadable: {path} - {reason}")]
    TemplateUnreadable { path: String, reason: String },

    #[error("Request failed: {details}")]
    TransportError { details: String },

    #[error("Error reading response: {details}")]
    ResponseReadError { details: String },

    #[error("Timeout occurred: {operation} after {duration_ms}ms")]
    Timeout { operation: String, duration_ms: u64 },

    #[error("Failed to write output: {details}")]
    OutputError { details: String },
}

impl TabbyError {
    /// Create a configuration error
    pub fn configuration(component: &str, reason: &str) -> Self {
        Self::ConfigurationError {
            component: component.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an interval parsing error
    pub fn invalid_interval(value: &str, reason: &str) -> Self {
        Self::InvalidInterval {
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a transport error from any displayable cause
    pub fn transport(details: impl std::fmt::Display) -> Self {
        Self::TransportError {
            details: details.to_string(),
        }
    }

    /// Create a response body read error
    pub fn response_read(details: impl std::fmt::Display) -> Self {
        Self::ResponseReadError {
            details: details.to_string(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: &str, duration_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.to_string(),
            duration_ms,
        }
    }

    /// Create an error for a failed write to the user's terminal or pipe
    pub fn output(details: impl std::fmt::Display) -> Self {
        Self::OutputError {
            details: details.to_string(),
        }
    }

    /// Check if the error may be retried on the next scheduled iteration.
    ///
    /// Whether it actually is retried also depends on the loop budget, see
    /// [`crate::execution::FailureDisposition`].
    pub fn is_recoverable(&self) -> bool {
        match self {
            TabbyError::TransportError { .. } => true,
            TabbyError::ResponseReadError { .. } => true,
            TabbyError::Timeout { .. } => true,

            TabbyError::ConfigurationError { .. } => false,
            TabbyError::InvalidInterval { .. } => false,
            TabbyError::TemplateUnreadable { .. } => false,
            TabbyError::OutputError { .. } => false,
        }
    }

    /// Get error category for grouping and exit codes
    pub fn category(&self) -> ErrorCategory {
        match self {
            TabbyError::ConfigurationError { .. } => ErrorCategory::Configuration,
            TabbyError::InvalidInterval { .. } => ErrorCategory::Configuration,
            TabbyError::TemplateUnreadable { .. } => ErrorCategory::Configuration,

            TabbyError::TransportError { .. } => ErrorCategory::Transport,
            TabbyError::ResponseReadError { .. } => ErrorCategory::Transport,
            TabbyError::Timeout { .. } => ErrorCategory::Transport,

            TabbyError::OutputError { .. } => ErrorCategory::Runtime,
        }
    }

    /// Process exit code used when this error aborts a run
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 2,
            ErrorCategory::Transport | ErrorCategory::Runtime => 1,
        }
    }

    /// Get suggested remediation for the error
    pub fn remediation(&self) -> String {
        match self {
            TabbyError::ConfigurationError { component, reason } => {
                format!("Fix the '{}' setting: {}.", component, reason)
            }
            TabbyError::InvalidInterval { value, .. } => {
                format!("'{}' is not a valid interval. Use forms like 500ms, 1s, 2m or 1m30s.", value)
            }
            TabbyError::TemplateUnreadable { path, .. } => {
                format!("Check that '{}' exists and is readable.", path)
            }
            TabbyError::TransportError { .. } => {
                "Check the target URL, DNS resolution and that the server is reachable.".to_string()
            }
            TabbyError::ResponseReadError { .. } => {
                "The server closed the connection while sending the body. Retry or check server logs.".to_string()
            }
            TabbyError::Timeout { duration_ms, .. } => {
                format!("No response within {}ms. Increase --timeout or check target responsiveness.", duration_ms)
            }
            TabbyError::OutputError { .. } => {
                "Standard output was closed or is not writable. Check the pipe or redirect target.".to_string()
            }
        }
    }
}

/// Error categories for grouping and exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Transport,
    Runtime,
}

/// Result type for tabby engine operations
pub type TabbyResult<T> = Result<T, TabbyError>;
