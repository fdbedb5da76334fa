//! # LocalVM Executor
//!
//! Runs commands by name: the name is resolved to a handler type (with a
//! cache in front of the resolver), an instance is obtained from an
//! [`InstanceProvider`], and the call runs through a [`FilterChain`] that ends
//! in the command itself.
//!
//! ## Quick Start
//!
//! ```text
//! use localvm_executor::{Call, Container, Dispatcher, SymbolTable};
//!
//! let container = Container::new();
//! container.bind_default::<Echo>();
//!
//! let dispatcher = Dispatcher::builder()
//!     .resolver(SymbolTable::new().with::<Echo>("echo"))
//!     .provider(container)
//!     .build()?;
//!
//! let result = dispatcher.execute("echo", &Call::new().with_argument("msg", "hi"))?;
//! assert_eq!(result.get("msg"), Some(&"hi".into()));
//! ```
//!
//! ## Components
//!
//! | Component | Role |
//! |-----------|------|
//! | [`SymbolTable`] / [`Resolver`] | name → [`HandlerType`] |
//! | [`HandlerCache`] | caches successful resolutions, never failures |
//! | [`InstanceProvider`] / [`Container`] | [`HandlerType`] → command instance |
//! | [`Filter`] / [`FilterChainFactory`] | middleware around execution |
//! | [`ExecutingFilterChain`] | terminal stage that runs the command |
//! | [`Dispatcher`] | public entry point |

#![warn(missing_docs)]

mod cache;
mod chain;
mod config;
mod convert;
mod dispatcher;
mod executing;
mod filters;
mod provider;
mod resolver;
mod symbols;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API
// =============================================================================

pub use cache::{CacheStats, HandlerCache};
pub use chain::{
    chain_fn, filter_fn, DefaultFilterChainFactory, Filter, FilterChain, FilterChainFactory,
    FilterPipeline, FnChain, FnFilter, Next,
};
pub use config::{ConfigError, DispatchConfig, CONFIG_FILE_NAME, DEFAULT_CACHE_CAPACITY};
pub use dispatcher::{BuildError, Dispatcher, DispatcherBuilder};
pub use executing::ExecutingFilterChain;
pub use filters::LoggingFilter;
pub use provider::{ConstructionError, Container, InstanceProvider};
pub use resolver::{HandlerType, ResolveError, Resolver};
pub use symbols::SymbolTable;

// Re-export the core types so users don't need localvm-core directly
pub use localvm_core::{Call, CallId, Command, Error, Result, ResultMap, Value};
