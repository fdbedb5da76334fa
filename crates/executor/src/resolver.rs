//! Name to handler-type resolution.
//!
//! A [`Resolver`] turns an untrusted command name into a [`HandlerType`].
//! The name is only ever used as a lookup key. Resolution must be
//! deterministic and free of side effects: the handler cache may call it
//! more than once for the same name when lookups race.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

/// Descriptor of a concrete handler implementation.
///
/// Immutable once resolved and cheap to clone. The [`TypeId`] is what an
/// [`InstanceProvider`](crate::InstanceProvider) keys its bindings on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerType {
    symbol: Arc<str>,
    type_name: &'static str,
    type_id: TypeId,
}

impl HandlerType {
    /// Describe the Rust type `T` registered under `symbol`
    pub fn of<T: 'static>(symbol: impl Into<Arc<str>>) -> Self {
        Self {
            symbol: symbol.into(),
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }

    /// The name the type was registered under
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The Rust type name, for diagnostics only
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The `TypeId` of the concrete type
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

impl fmt::Display for HandlerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol, self.type_name)
    }
}

/// Why a name could not be resolved.
///
/// Internal only: the dispatcher collapses both kinds into
/// [`Error::CommandNotAvailable`](localvm_core::Error::CommandNotAvailable).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Nothing is registered under this name
    #[error("no symbol named {name}")]
    NotFound { name: String },

    /// A type is registered under this name but it is not a command
    #[error("symbol {name} resolves to {type_name}, which is not a command")]
    NotAHandler {
        name: String,
        type_name: &'static str,
    },
}

/// Resolves command names to handler types.
pub trait Resolver: Send + Sync {
    /// Look up the handler type registered under `name`.
    fn load(&self, name: &str) -> Result<HandlerType, ResolveError>;
}

impl<R: Resolver + ?Sized> Resolver for Arc<R> {
    fn load(&self, name: &str) -> Result<HandlerType, ResolveError> {
        (**self).load(name)
    }
}

impl<R: Resolver + ?Sized> Resolver for Box<R> {
    fn load(&self, name: &str) -> Result<HandlerType, ResolveError> {
        (**self).load(name)
    }
}
