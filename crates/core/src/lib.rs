//! Core types for LocalVM command dispatch
//!
//! This crate defines the types shared by the dispatcher and by command
//! authors:
//! - Call / CallId: Immutable per-invocation input
//! - ResultMap: Insertion-ordered command output
//! - Command: The capability every handler implements
//! - Error: The externally visible failure kinds
//! - Value: Dynamic argument and result values (JSON model)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod call;
pub mod command;
pub mod error;
pub mod result_map;

pub use call::{Call, CallId};
pub use command::Command;
pub use error::{Error, Result};
pub use result_map::ResultMap;

/// Dynamic value type used for arguments and results
pub use serde_json::Value;
