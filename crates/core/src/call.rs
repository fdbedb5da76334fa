//! Per-invocation call context.
//!
//! A [`Call`] is built by the transport layer for one request and handed to
//! the dispatcher by reference. Nothing can mutate it once built, so the
//! filters and the command of a single dispatch all observe the same input.

use serde::{Deserialize, Serialize};
use serde_json::Map;
use std::fmt;
use uuid::Uuid;

use crate::Value;

/// Unique identifier for a single call
///
/// Wraps a UUID v4. Used to correlate log lines of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(Uuid);

impl CallId {
    /// Create a new random CallId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a CallId from its string form
    ///
    /// Returns None if the string is not a valid UUID.
    pub fn from_string(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }

    /// Get the raw bytes of this CallId
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The input of one dispatch: named arguments plus an optional session.
///
/// # Example
///
/// ```
/// use localvm_core::{Call, Value};
///
/// let call = Call::new()
///     .with_argument("msg", "hi")
///     .with_session("session-42");
///
/// assert_eq!(call.argument("msg"), Some(&Value::from("hi")));
/// assert_eq!(call.session(), Some("session-42"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    id: CallId,
    arguments: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session: Option<String>,
}

impl Call {
    /// Create an empty call with a fresh id
    pub fn new() -> Self {
        Self {
            id: CallId::new(),
            arguments: Map::new(),
            session: None,
        }
    }

    /// Create a call from an existing argument map
    pub fn with_arguments(arguments: Map<String, Value>) -> Self {
        Self {
            arguments,
            ..Self::new()
        }
    }

    /// Add (or replace) a named argument
    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    /// Attach the session this call belongs to
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    /// The id of this call
    pub fn id(&self) -> CallId {
        self.id
    }

    /// All arguments, in the order they were supplied
    pub fn arguments(&self) -> &Map<String, Value> {
        &self.arguments
    }

    /// A single argument by name
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    /// The session this call belongs to, if any
    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }
}

impl Default for Call {
    fn default() -> Self {
        Self::new()
    }
}
