//! Shared fixtures: a tiny user service exposed as commands.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

pub use localvm::{
    filter_fn, Call, Command, Container, DispatchConfig, Dispatcher, DispatcherBuilder, Error,
    Filter, Next,
    Result, ResultMap, SymbolTable, Value,
};

/// Copies `msg` from the call into the result.
#[derive(Debug, Default)]
pub struct Echo;

impl Command for Echo {
    fn execute(&self, call: &Call, result: &mut ResultMap) -> Result<()> {
        let msg = call
            .argument("msg")
            .ok_or_else(|| Error::execution("MissingArgument", "msg"))?;
        result.insert("msg", msg.clone());
        Ok(())
    }
}

/// In-memory user store shared by the user commands.
#[derive(Debug, Default)]
pub struct UserRepo {
    users: Mutex<BTreeMap<String, String>>,
}

impl UserRepo {
    pub fn len(&self) -> usize {
        self.users.lock().len()
    }
}

fn required_str<'a>(call: &'a Call, name: &str) -> Result<&'a str> {
    call.argument(name)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::execution("MissingArgument", name))
}

#[derive(Debug)]
pub struct CreateUser {
    repo: Arc<UserRepo>,
}

impl Command for CreateUser {
    fn execute(&self, call: &Call, result: &mut ResultMap) -> Result<()> {
        let id = required_str(call, "id")?;
        let name = required_str(call, "name")?;
        let mut users = self.repo.users.lock();
        if users.contains_key(id) {
            return Err(Error::execution("UserExists", id));
        }
        users.insert(id.to_string(), name.to_string());
        result.insert("id", id);
        result.insert("created", true);
        Ok(())
    }
}

#[derive(Debug)]
pub struct GetUser {
    repo: Arc<UserRepo>,
}

impl Command for GetUser {
    fn execute(&self, call: &Call, result: &mut ResultMap) -> Result<()> {
        let id = required_str(call, "id")?;
        let users = self.repo.users.lock();
        let name = users
            .get(id)
            .ok_or_else(|| Error::execution("UserNotFound", id))?;
        result.insert("id", id);
        result.insert("name", name.as_str());
        Ok(())
    }
}

/// Module-style registration: symbols and bindings for the user service.
pub struct App {
    pub symbols: SymbolTable,
    pub container: Container,
    pub repo: Arc<UserRepo>,
}

pub fn app() -> App {
    let repo = Arc::new(UserRepo::default());

    let mut symbols = SymbolTable::new();
    symbols
        .register::<Echo>("echo")
        .register::<CreateUser>("user.create")
        .register::<GetUser>("user.get")
        .register_type::<UserRepo>("user.repo");

    let container = Container::new();
    container.bind_default::<Echo>();
    let create_repo = Arc::clone(&repo);
    container.bind::<CreateUser, _>(move || {
        Ok(CreateUser {
            repo: Arc::clone(&create_repo),
        })
    });
    container.bind_singleton(GetUser {
        repo: Arc::clone(&repo),
    });

    App {
        symbols,
        container,
        repo,
    }
}

/// Builder preloaded with [`app`]; callers add filters or config.
pub fn builder() -> (DispatcherBuilder, Arc<UserRepo>) {
    let App {
        symbols,
        container,
        repo,
    } = app();
    let builder = Dispatcher::builder().resolver(symbols).provider(container);
    (builder, repo)
}

pub fn dispatcher() -> (Dispatcher, Arc<UserRepo>) {
    let (builder, repo) = builder();
    (builder.build().expect("dispatcher config is valid"), repo)
}
