//! Handler instance construction.
//!
//! The dispatcher does not build handlers itself. It asks an
//! [`InstanceProvider`] for a ready-to-use instance of a resolved
//! [`HandlerType`]. Object-graph wiring lives behind that trait.
//!
//! [`Container`] is a small provider keyed by `TypeId` for applications that
//! do not bring their own.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use localvm_core::{Command, Error};
use parking_lot::RwLock;
use tracing::trace;

use crate::resolver::HandlerType;

/// Why a handler instance could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructionError {
    /// The provider has no binding for the handler type
    #[error("no binding for {type_name}")]
    Unbound { type_name: &'static str },

    /// The binding exists but building the instance failed
    #[error("failed to construct {type_name}: {reason}")]
    Failed {
        type_name: &'static str,
        reason: String,
    },
}

impl ConstructionError {
    /// Create a `Failed` error for the handler type `C`
    pub fn failed<C: 'static>(reason: impl Into<String>) -> Self {
        ConstructionError::Failed {
            type_name: std::any::type_name::<C>(),
            reason: reason.into(),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            ConstructionError::Unbound { type_name }
            | ConstructionError::Failed { type_name, .. } => *type_name,
        }
    }
}

impl From<ConstructionError> for Error {
    fn from(e: ConstructionError) -> Self {
        Error::ConstructionFailure {
            handler: e.type_name().to_string(),
            reason: e.to_string(),
        }
    }
}

/// Produces handler instances for resolved handler types.
pub trait InstanceProvider: Send + Sync {
    /// Build or look up an instance of `ty`.
    fn instance(&self, ty: &HandlerType) -> Result<Arc<dyn Command>, ConstructionError>;
}

impl<P: InstanceProvider + ?Sized> InstanceProvider for Arc<P> {
    fn instance(&self, ty: &HandlerType) -> Result<Arc<dyn Command>, ConstructionError> {
        (**self).instance(ty)
    }
}

type Factory = Arc<dyn Fn() -> Result<Arc<dyn Command>, ConstructionError> + Send + Sync>;

enum Binding {
    Singleton(Arc<dyn Command>),
    Factory(Factory),
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Singleton(instance) => f.debug_tuple("Singleton").field(instance).finish(),
            Binding::Factory(_) => f.write_str("Factory"),
        }
    }
}

/// `TypeId`-keyed instance provider.
///
/// Bindings may be added after the container is shared; lookups take a read
/// lock and release it before a factory runs.
///
/// # Example
///
/// ```ignore
/// let container = Container::new();
/// container.bind_default::<Echo>();
/// container.bind_singleton(UserGet::new(repo.clone()));
/// container.bind::<Audit, _>(|| Audit::connect(&url).map_err(|e| {
///     ConstructionError::failed::<Audit>(e.to_string())
/// }));
/// ```
#[derive(Debug, Default)]
pub struct Container {
    bindings: RwLock<HashMap<TypeId, Binding>>,
}

impl Container {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `C` to a factory that builds a fresh instance per call
    pub fn bind<C, F>(&self, factory: F) -> &Self
    where
        C: Command + 'static,
        F: Fn() -> Result<C, ConstructionError> + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move || factory().map(|c| Arc::new(c) as Arc<dyn Command>));
        self.insert::<C>(Binding::Factory(factory))
    }

    /// Bind `C` to `C::default()`, built fresh per call
    pub fn bind_default<C>(&self) -> &Self
    where
        C: Command + Default + 'static,
    {
        self.bind::<C, _>(|| Ok(C::default()))
    }

    /// Bind `C` to a single shared instance
    pub fn bind_singleton<C>(&self, instance: C) -> &Self
    where
        C: Command + 'static,
    {
        self.insert::<C>(Binding::Singleton(Arc::new(instance)))
    }

    fn insert<C: 'static>(&self, binding: Binding) -> &Self {
        trace!(type_name = std::any::type_name::<C>(), ?binding, "Binding handler type");
        self.bindings.write().insert(TypeId::of::<C>(), binding);
        self
    }

    /// Whether the type `C` has a binding
    pub fn is_bound<C: 'static>(&self) -> bool {
        self.bindings.read().contains_key(&TypeId::of::<C>())
    }
}

impl InstanceProvider for Container {
    fn instance(&self, ty: &HandlerType) -> Result<Arc<dyn Command>, ConstructionError> {
        let factory = {
            let bindings = self.bindings.read();
            match bindings.get(&ty.type_id()) {
                None => {
                    return Err(ConstructionError::Unbound {
                        type_name: ty.type_name(),
                    })
                }
                Some(Binding::Singleton(instance)) => return Ok(Arc::clone(instance)),
                Some(Binding::Factory(factory)) => Arc::clone(factory),
            }
        };
        factory()
    }
}
