//! Error types for synchroscope.
//!
//! The numerical core has no recoverable-error paths: operator inputs are
//! clamped before they reach the phase model or the zone classifier. The
//! fallible surfaces are configuration loading and concurrent breaker
//! command issuance.

use thiserror::Error;

/// Result type alias for synchroscope operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Unified error type for all synchroscope operations.
#[derive(Debug, Error)]
pub enum SyncError {
    // ===== Command Errors =====
    /// A breaker-close command was issued while another is still pending.
    ///
    /// A close command is committed once issued; callers must wait for the
    /// pending command to resolve (or reset the engine) before issuing
    /// another.
    #[error("breaker command already pending (issued at t={issued_at_secs:.2}s)")]
    CommandPending {
        /// Simulated time at which the pending command was issued.
        issued_at_secs: f64,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this error is a command rejection (pending breaker close).
    #[must_use]
    pub const fn is_command_pending(&self) -> bool {
        matches!(self, Self::CommandPending { .. })
    }
}
