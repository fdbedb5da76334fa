//! LocalVM - dynamic command dispatch
//!
//! Resolves a command name to a handler, builds the handler through an
//! instance provider, and runs it inside a chain of filters.
//!
//! # Quick Start
//!
//! ```ignore
//! use localvm::{Call, Container, Dispatcher, SymbolTable};
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
//! ```
//!
//! # Architecture
//!
//! All operations go through the [`Dispatcher`]. Command authors implement
//! [`Command`]; cross-cutting behaviour is added as a [`Filter`].

// Re-export the public API from localvm-executor
pub use localvm_executor::*;
