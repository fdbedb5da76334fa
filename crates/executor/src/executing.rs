//! The terminal chain stage that actually runs a command.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};

use localvm_core::{Call, Command, Error, Result, ResultMap};
use parking_lot::Mutex;
use tracing::{debug, error};

use crate::chain::FilterChain;

/// Terminal [`FilterChain`] stage: invokes the command with a fresh result map.
///
/// Failures are logged and passed on untouched:
/// - expected errors (anything but `Error::Fault`) at `debug`
/// - `Error::Fault` at `error`
/// - panics at `error`, then resumed with the original payload
///
/// Stateless; a single instance is shared by every dispatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutingFilterChain;

impl FilterChain for ExecutingFilterChain {
    fn filter(&self, call: &Call, command: &dyn Command) -> Result<ResultMap> {
        let mut result = ResultMap::new();
        debug!(call = %call.id(), ?command, "Executing");

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| command.execute(call, &mut result)));
        match outcome {
            Ok(Ok(())) => Ok(result),
            Ok(Err(e)) if e.is_expected() => {
                debug!(call = %call.id(), ?command, error = %e, "An expected error was returned while executing");
                Err(e)
            }
            Ok(Err(e)) => {
                error!(call = %call.id(), ?command, error = %e, "An unexpected fault was returned while executing");
                Err(e)
            }
            Err(payload) => {
                error!(
                    call = %call.id(),
                    ?command,
                    panic = panic_message(payload.as_ref()),
                    "An unexpected panic escaped while executing"
                );
                panic::resume_unwind(payload)
            }
        }
    }
}

/// Per-dispatch wrapper around [`ExecutingFilterChain`] that remembers which
/// failures the terminal stage has already reported at `error`.
#[derive(Debug, Default)]
pub(crate) struct ObservedTerminal {
    fault: Mutex<Option<Error>>,
    panicked: AtomicBool,
}

impl ObservedTerminal {
    /// True if `error` is the fault the terminal stage returned and logged.
    pub(crate) fn reported(&self, error: &Error) -> bool {
        self.fault.lock().as_ref() == Some(error)
    }

    /// True if the command itself panicked.
    pub(crate) fn panicked(&self) -> bool {
        self.panicked.load(Ordering::Relaxed)
    }
}

impl FilterChain for ObservedTerminal {
    fn filter(&self, call: &Call, command: &dyn Command) -> Result<ResultMap> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| ExecutingFilterChain.filter(call, command)));
        match outcome {
            Ok(Err(e)) if !e.is_expected() => {
                *self.fault.lock() = Some(e.clone());
                Err(e)
            }
            Ok(other) => other,
            Err(payload) => {
                self.panicked.store(true, Ordering::Relaxed);
                panic::resume_unwind(payload)
            }
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}
