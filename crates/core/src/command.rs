//! The command capability implemented by handler authors.

use std::fmt;
use std::sync::Arc;

use crate::{Call, Result, ResultMap};

/// A unit of business logic invoked by name.
///
/// A command reads its input from the [`Call`] and writes its output into the
/// supplied [`ResultMap`] instead of returning a new one. The map arrives
/// empty; entries are rendered in the order the command inserts them.
///
/// Returning [`Error::Execution`](crate::Error::Execution) signals an expected,
/// classified failure. [`Error::Fault`](crate::Error::Fault) and panics are
/// treated as unanticipated.
///
/// Instances may be shared between concurrent calls, hence `Send + Sync`.
///
/// # Example
///
/// ```
/// use localvm_core::{Call, Command, Result, ResultMap};
///
/// #[derive(Debug, Default)]
/// struct Echo;
///
/// impl Command for Echo {
///     fn execute(&self, call: &Call, result: &mut ResultMap) -> Result<()> {
///         if let Some(msg) = call.argument("msg") {
///             result.insert("msg", msg.clone());
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Command: Send + Sync + fmt::Debug {
    /// Run the command for one call.
    fn execute(&self, call: &Call, result: &mut ResultMap) -> Result<()>;
}

impl<C: Command + ?Sized> Command for Arc<C> {
    fn execute(&self, call: &Call, result: &mut ResultMap) -> Result<()> {
        (**self).execute(call, result)
    }
}

impl<C: Command + ?Sized> Command for Box<C> {
    fn execute(&self, call: &Call, result: &mut ResultMap) -> Result<()> {
        (**self).execute(call, result)
    }
}
