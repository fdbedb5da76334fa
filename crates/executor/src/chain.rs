//! Filter chains around command execution.
//!
//! A dispatch runs through an ordered list of [`Filter`] stages that end in a
//! terminal [`FilterChain`] which invokes the command. Each stage receives a
//! [`Next`] handle for the rest of the chain. `Next::proceed` consumes the
//! handle, so a stage can continue the chain at most once; returning without
//! calling it short-circuits the call and the command never runs.
//!
//! Chains are built per dispatch by a [`FilterChainFactory`] from a shared,
//! immutable list of stages.
//!
//! ```text
//! filter[0] -> filter[1] -> ... -> terminal (invoke command)
//! ```

use std::fmt;
use std::sync::Arc;

use localvm_core::{Call, Command, Result, ResultMap};

/// A complete chain: turns a call and a command instance into a result.
pub trait FilterChain: Send + Sync {
    /// Run the chain for one call.
    fn filter(&self, call: &Call, command: &dyn Command) -> Result<ResultMap>;
}

/// One middleware stage.
pub trait Filter: Send + Sync {
    /// Handle one call, delegating to `next` to continue the chain.
    fn filter(&self, call: &Call, command: &dyn Command, next: Next<'_>) -> Result<ResultMap>;
}

/// The remainder of a chain, as seen from inside a [`Filter`].
pub struct Next<'a> {
    filters: &'a [Arc<dyn Filter>],
    terminal: &'a dyn FilterChain,
}

impl<'a> Next<'a> {
    /// Continue with the next stage, or the terminal if none are left.
    pub fn proceed(self, call: &Call, command: &dyn Command) -> Result<ResultMap> {
        match self.filters.split_first() {
            Some((stage, rest)) => stage.filter(
                call,
                command,
                Next {
                    filters: rest,
                    terminal: self.terminal,
                },
            ),
            None => self.terminal.filter(call, command),
        }
    }

    /// Number of stages left before the terminal
    pub fn remaining(&self) -> usize {
        self.filters.len()
    }
}

/// Builds the chain used for one dispatch.
pub trait FilterChainFactory: Send + Sync {
    /// Wrap `terminal` in this factory's stages.
    fn create(&self, terminal: Arc<dyn FilterChain>) -> Box<dyn FilterChain>;
}

/// A chain of filters ending in a terminal stage.
pub struct FilterPipeline {
    filters: Arc<[Arc<dyn Filter>]>,
    terminal: Arc<dyn FilterChain>,
}

impl FilterChain for FilterPipeline {
    fn filter(&self, call: &Call, command: &dyn Command) -> Result<ResultMap> {
        Next {
            filters: &self.filters,
            terminal: self.terminal.as_ref(),
        }
        .proceed(call, command)
    }
}

/// Factory wrapping the terminal in a fixed, ordered list of filters.
///
/// The first filter added is the outermost. The filter list is immutable and
/// shared by every chain the factory creates.
#[derive(Clone)]
pub struct DefaultFilterChainFactory {
    filters: Arc<[Arc<dyn Filter>]>,
}

impl DefaultFilterChainFactory {
    /// A factory with no filters; chains run the terminal directly
    pub fn new() -> Self {
        Self::from_filters(Vec::new())
    }

    /// A factory with the given filters, outermost first
    pub fn from_filters(filters: Vec<Arc<dyn Filter>>) -> Self {
        Self {
            filters: filters.into(),
        }
    }

    /// Append a filter inside the ones already present
    pub fn with(self, filter: impl Filter + 'static) -> Self {
        self.with_arc(Arc::new(filter))
    }

    /// Append an already shared filter
    pub fn with_arc(self, filter: Arc<dyn Filter>) -> Self {
        let mut filters = self.filters.to_vec();
        filters.push(filter);
        Self::from_filters(filters)
    }

    /// Number of filters
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether there are no filters
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Default for DefaultFilterChainFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DefaultFilterChainFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultFilterChainFactory")
            .field("filters", &self.filters.len())
            .finish()
    }
}

impl FilterChainFactory for DefaultFilterChainFactory {
    fn create(&self, terminal: Arc<dyn FilterChain>) -> Box<dyn FilterChain> {
        Box::new(FilterPipeline {
            filters: Arc::clone(&self.filters),
            terminal,
        })
    }
}

/// A [`Filter`] backed by a closure. See [`filter_fn`].
pub struct FnFilter<F>(F);

/// Create a filter from a closure.
///
/// ```ignore
/// let deny = filter_fn(|call, command, next| {
///     if call.session().is_none() {
///         return Err(Error::execution("Unauthenticated", "login required"));
///     }
///     next.proceed(call, command)
/// });
/// ```
pub fn filter_fn<F>(f: F) -> FnFilter<F>
where
    F: Fn(&Call, &dyn Command, Next<'_>) -> Result<ResultMap> + Send + Sync,
{
    FnFilter(f)
}

impl<F> Filter for FnFilter<F>
where
    F: Fn(&Call, &dyn Command, Next<'_>) -> Result<ResultMap> + Send + Sync,
{
    fn filter(&self, call: &Call, command: &dyn Command, next: Next<'_>) -> Result<ResultMap> {
        (self.0)(call, command, next)
    }
}

/// A [`FilterChain`] backed by a closure. See [`chain_fn`].
pub struct FnChain<F>(F);

/// Create a chain (typically a terminal stage) from a closure.
pub fn chain_fn<F>(f: F) -> FnChain<F>
where
    F: Fn(&Call, &dyn Command) -> Result<ResultMap> + Send + Sync,
{
    FnChain(f)
}

impl<F> FilterChain for FnChain<F>
where
    F: Fn(&Call, &dyn Command) -> Result<ResultMap> + Send + Sync,
{
    fn filter(&self, call: &Call, command: &dyn Command) -> Result<ResultMap> {
        (self.0)(call, command)
    }
}
