//! The Dispatcher - single entry point for named command execution.
//!
//! Each call runs one linear pipeline:
//!
//! ```text
//! name ──► HandlerCache/Resolver ──► InstanceProvider ──► FilterChain ──► ResultMap
//! ```
//!
//! The only state shared between calls is the handler cache.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use localvm_core::{Call, Error, Result, ResultMap};
use tracing::{debug, error, trace};

use crate::cache::{CacheStats, HandlerCache};
use crate::chain::{DefaultFilterChainFactory, Filter, FilterChainFactory};
use crate::config::DispatchConfig;
use crate::executing::{panic_message, ObservedTerminal};
use crate::filters::LoggingFilter;
use crate::provider::InstanceProvider;
use crate::resolver::Resolver;

/// Resolves, instantiates and runs commands by name.
///
/// # Thread Safety
///
/// `Dispatcher` is `Send + Sync`; share it with `Arc` and call
/// [`execute`](Self::execute) from any number of threads. Calls never block
/// each other except briefly on the sharded handler cache.
///
/// # Example
///
/// ```ignore
/// use localvm_executor::{Container, Dispatcher, SymbolTable};
///
/// let symbols = SymbolTable::new().with::<Echo>("echo");
/// let container = Container::new();
/// container.bind_default::<Echo>();
///
/// let dispatcher = Dispatcher::builder()
///     .resolver(symbols)
///     .provider(container)
///     .build()?;
///
/// let result = dispatcher.execute("echo", &Call::new().with_argument("msg", "hi"))?;
/// ```
pub struct Dispatcher {
    resolver: Arc<dyn Resolver>,
    provider: Arc<dyn InstanceProvider>,
    chain_factory: Arc<dyn FilterChainFactory>,
    cache: HandlerCache,
}

impl Dispatcher {
    /// Create a dispatcher with an explicit chain factory and default cache settings.
    pub fn new(
        resolver: impl Resolver + 'static,
        provider: impl InstanceProvider + 'static,
        chain_factory: impl FilterChainFactory + 'static,
    ) -> Self {
        Self::from_parts(
            Arc::new(resolver),
            Arc::new(provider),
            Arc::new(chain_factory),
            HandlerCache::new(DispatchConfig::default().cache_capacity),
        )
    }

    /// Start building a dispatcher.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    fn from_parts(
        resolver: Arc<dyn Resolver>,
        provider: Arc<dyn InstanceProvider>,
        chain_factory: Arc<dyn FilterChainFactory>,
        cache: HandlerCache,
    ) -> Self {
        Self {
            resolver,
            provider,
            chain_factory,
            cache,
        }
    }

    /// Execute the command registered under `name`.
    ///
    /// `call` may be passed as `&Call` or as an `Option<&Call>`; an absent
    /// call fails with [`Error::InvalidCall`] before any lookup happens.
    ///
    /// # Errors
    ///
    /// - `InvalidCall` if `call` is `None`
    /// - `CommandNotAvailable` if `name` is unknown or is not a command
    /// - `ConstructionFailure` if the handler instance cannot be built
    /// - whatever the filter chain or the command returns, unchanged
    pub fn execute<'c>(&self, name: &str, call: impl Into<Option<&'c Call>>) -> Result<ResultMap> {
        let call = call
            .into()
            .ok_or_else(|| Error::invalid_call("call context is absent"))?;
        trace!(command = name, call = %call.id(), "Dispatching");

        let ty = self.cache.resolve(self.resolver.as_ref(), name).map_err(|e| {
            debug!(command = name, reason = %e, "Command not available");
            Error::from(e)
        })?;

        let command = self.provider.instance(&ty).map_err(|e| {
            error!(command = name, handler = %ty, error = %e, "Failed to construct handler");
            Error::from(e)
        })?;

        let terminal = Arc::new(ObservedTerminal::default());
        let chain = self.chain_factory.create(Arc::clone(&terminal) as _);

        // Faults and panics raised by filters are reported here; the terminal
        // stage has already reported its own.
        match panic::catch_unwind(AssertUnwindSafe(|| chain.filter(call, command.as_ref()))) {
            Ok(Err(e)) if !e.is_expected() && !terminal.reported(&e) => {
                error!(command = name, call = %call.id(), error = %e, "An unexpected fault was returned by a filter");
                Err(e)
            }
            Ok(outcome) => outcome,
            Err(payload) => {
                if !terminal.panicked() {
                    error!(
                        command = name,
                        call = %call.id(),
                        panic = panic_message(payload.as_ref()),
                        "An unexpected panic escaped from a filter"
                    );
                }
                panic::resume_unwind(payload)
            }
        }
    }

    /// Execute several commands sequentially.
    ///
    /// Returns one result per request, in request order. A failing request
    /// does not stop the ones after it.
    pub fn execute_many(&self, requests: &[(&str, Call)]) -> Vec<Result<ResultMap>> {
        requests
            .iter()
            .map(|(name, call)| self.execute(name, call))
            .collect()
    }

    /// Drop the cached resolution for `name`.
    pub fn invalidate(&self, name: &str) -> bool {
        self.cache.invalidate(name)
    }

    /// Snapshot of the handler cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Errors assembling a [`Dispatcher`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// No resolver was supplied
    #[error("a resolver is required")]
    MissingResolver,

    /// No instance provider was supplied
    #[error("an instance provider is required")]
    MissingProvider,

    /// Filters were added alongside a custom chain factory
    #[error("filters cannot be combined with a custom chain factory")]
    FiltersWithCustomFactory,
}

/// Step-by-step [`Dispatcher`] construction.
///
/// Without a custom chain factory, the builder creates a
/// [`DefaultFilterChainFactory`] from the added filters, preceded by
/// [`LoggingFilter`] when `log_calls` is enabled in the config.
#[derive(Default)]
pub struct DispatcherBuilder {
    resolver: Option<Arc<dyn Resolver>>,
    provider: Option<Arc<dyn InstanceProvider>>,
    chain_factory: Option<Arc<dyn FilterChainFactory>>,
    filters: Vec<Arc<dyn Filter>>,
    config: DispatchConfig,
}

impl DispatcherBuilder {
    /// Set the resolver
    pub fn resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Set the instance provider
    pub fn provider(mut self, provider: impl InstanceProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Replace the default chain factory
    pub fn chain_factory(mut self, factory: impl FilterChainFactory + 'static) -> Self {
        self.chain_factory = Some(Arc::new(factory));
        self
    }

    /// Add a filter inside the ones already added
    pub fn filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Use this configuration
    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Assemble the dispatcher.
    pub fn build(self) -> std::result::Result<Dispatcher, BuildError> {
        let resolver = self.resolver.ok_or(BuildError::MissingResolver)?;
        let provider = self.provider.ok_or(BuildError::MissingProvider)?;

        let chain_factory = match self.chain_factory {
            Some(_) if !self.filters.is_empty() => {
                return Err(BuildError::FiltersWithCustomFactory)
            }
            Some(factory) => factory,
            None => {
                let mut filters: Vec<Arc<dyn Filter>> = Vec::with_capacity(self.filters.len() + 1);
                if self.config.log_calls {
                    filters.push(Arc::new(LoggingFilter));
                }
                filters.extend(self.filters);
                Arc::new(DefaultFilterChainFactory::from_filters(filters))
            }
        };

        Ok(Dispatcher::from_parts(
            resolver,
            provider,
            chain_factory,
            HandlerCache::new(self.config.cache_capacity),
        ))
    }
}
