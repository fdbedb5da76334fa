//! Error types for command dispatch.
//!
//! All failures a caller of the dispatcher can observe are represented by
//! the [`Error`] enum. Errors are:
//! - **Classified**: each variant is one externally visible failure kind
//! - **Serializable**: transport layers can ship them to remote callers
//! - **Opaque where it matters**: `CommandNotAvailable` carries the command
//!   name only, never how resolution failed

use serde::{Deserialize, Serialize};

/// Result type alias for dispatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Command dispatch errors.
///
/// # Categories
///
/// | Kind | Variant | Raised by |
/// |------|---------|-----------|
/// | Caller bug | `InvalidCall` | Dispatcher, before any resolution |
/// | Lookup | `CommandNotAvailable` | Dispatcher, for unknown or non-command symbols |
/// | Deployment | `ConstructionFailure` | Instance provider |
/// | Expected | `Execution` | Command implementations |
/// | Unexpected | `Fault` | Command implementations or filters |
///
/// # Example
///
/// ```ignore
/// use localvm_core::Error;
///
/// match dispatcher.execute("user.get", &call) {
///     Ok(result) => { /* render result */ }
///     Err(Error::CommandNotAvailable { command }) => {
///         println!("no such command: {}", command);
///     }
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    /// The call context was absent or unusable
    #[error("invalid call: {reason}")]
    InvalidCall { reason: String },

    /// No command is available under this name
    #[error("command not available: {command}")]
    CommandNotAvailable { command: String },

    /// The handler instance could not be constructed
    #[error("construction of {handler} failed: {reason}")]
    ConstructionFailure { handler: String, reason: String },

    /// A command rejected the call with a classified domain error
    #[error("{kind}: {message}")]
    Execution { kind: String, message: String },

    /// An unanticipated failure inside a command or filter
    #[error("unexpected fault: {reason}")]
    Fault { reason: String },
}

impl Error {
    /// Create an `InvalidCall` error
    pub fn invalid_call(reason: impl Into<String>) -> Self {
        Error::InvalidCall {
            reason: reason.into(),
        }
    }

    /// Create a `CommandNotAvailable` error for the given command name
    pub fn not_available(command: impl Into<String>) -> Self {
        Error::CommandNotAvailable {
            command: command.into(),
        }
    }

    /// Create a classified execution error with a kind and a message payload
    pub fn execution(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Execution {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create a `Fault` error
    pub fn fault(reason: impl Into<String>) -> Self {
        Error::Fault {
            reason: reason.into(),
        }
    }

    /// Whether this error was anticipated by the code that raised it.
    ///
    /// Only `Fault` is unexpected; every other kind is part of the normal
    /// failure surface of a command.
    pub fn is_expected(&self) -> bool {
        !matches!(self, Error::Fault { .. })
    }
}
