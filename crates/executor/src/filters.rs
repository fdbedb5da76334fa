//! Built-in filters.

use std::time::Instant;

use localvm_core::{Call, Command, Result, ResultMap};
use tracing::{debug, debug_span};

use crate::chain::{Filter, Next};

/// Wraps each call in a `tracing` span and logs its outcome and duration.
///
/// Purely observational: the result or error of the inner chain is returned
/// as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingFilter;

impl Filter for LoggingFilter {
    fn filter(&self, call: &Call, command: &dyn Command, next: Next<'_>) -> Result<ResultMap> {
        let span = debug_span!(
            "call",
            id = %call.id(),
            session = call.session().unwrap_or("-")
        );
        let _guard = span.enter();

        let started = Instant::now();
        debug!(?command, arguments = call.arguments().len(), "Call started");

        let outcome = next.proceed(call, command);
        let elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        match &outcome {
            Ok(result) => debug!(elapsed_us, entries = result.len(), "Call completed"),
            Err(e) => debug!(elapsed_us, error = %e, "Call failed"),
        }
        outcome
    }
}
