//! Error conversion from internal error types.
//!
//! Resolution failures are collapsed here: "no such symbol" and "symbol is
//! not a command" both become [`Error::CommandNotAvailable`] carrying only
//! the requested name. Callers cannot tell the two apart.

use localvm_core::Error;

use crate::resolver::ResolveError;

impl From<ResolveError> for Error {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound { name } | ResolveError::NotAHandler { name, .. } => {
                Error::CommandNotAvailable { command: name }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_errors_collapse_to_same_error() {
        let not_found: Error = ResolveError::NotFound {
            name: "x".to_string(),
        }
        .into();
        let not_a_handler: Error = ResolveError::NotAHandler {
            name: "x".to_string(),
            type_name: "app::Settings",
        }
        .into();

        assert_eq!(not_found, not_a_handler);
        assert_eq!(not_found, Error::not_available("x"));
        assert!(!not_a_handler.to_string().contains("Settings"));
    }
}
