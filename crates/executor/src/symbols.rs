//! Static symbol table populated at startup.
//!
//! Commands are registered by name with an explicit call per type; there is
//! no runtime introspection. Registering a non-command type under a name is
//! allowed so that modules can publish other symbols in the same namespace;
//! looking such a name up as a command fails with `NotAHandler`.

use std::collections::HashMap;

use localvm_core::Command;
use tracing::trace;

use crate::resolver::{HandlerType, ResolveError, Resolver};

#[derive(Debug, Clone)]
struct Symbol {
    ty: HandlerType,
    is_command: bool,
}

/// Registration table mapping names to types.
///
/// # Example
///
/// ```ignore
/// let mut symbols = SymbolTable::new();
/// symbols
///     .register::<Echo>("echo")
///     .register::<UserGet>("user.get");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
}

impl SymbolTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the command type `C` under `name`.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register<C: Command + 'static>(&mut self, name: impl Into<String>) -> &mut Self {
        self.insert::<C>(name.into(), true)
    }

    /// Register a type that is not a command under `name`.
    pub fn register_type<T: 'static>(&mut self, name: impl Into<String>) -> &mut Self {
        self.insert::<T>(name.into(), false)
    }

    /// Builder-style [`register`](Self::register)
    pub fn with<C: Command + 'static>(mut self, name: impl Into<String>) -> Self {
        self.register::<C>(name);
        self
    }

    fn insert<T: 'static>(&mut self, name: String, is_command: bool) -> &mut Self {
        let ty = HandlerType::of::<T>(name.as_str());
        trace!(symbol = %name, type_name = ty.type_name(), is_command, "Registering symbol");
        self.symbols.insert(name, Symbol { ty, is_command });
        self
    }

    /// Whether anything is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Number of registered symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Names of all registered commands, sorted
    pub fn command_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .symbols
            .iter()
            .filter(|(_, s)| s.is_command)
            .map(|(n, _)| n.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl Resolver for SymbolTable {
    fn load(&self, name: &str) -> Result<HandlerType, ResolveError> {
        match self.symbols.get(name) {
            None => Err(ResolveError::NotFound {
                name: name.to_string(),
            }),
            Some(symbol) if !symbol.is_command => Err(ResolveError::NotAHandler {
                name: name.to_string(),
                type_name: symbol.ty.type_name(),
            }),
            Some(symbol) => Ok(symbol.ty.clone()),
        }
    }
}
