//! Middleware composition around real commands.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::common::*;

/// Records the outcome of every call that reaches it.
struct AuditFilter {
    log: Arc<Mutex<Vec<String>>>,
}

impl Filter for AuditFilter {
    fn filter(&self, call: &Call, command: &dyn Command, next: Next<'_>) -> Result<ResultMap> {
        let outcome = next.proceed(call, command);
        let entry = match &outcome {
            Ok(result) => format!("ok:{}", result.len()),
            Err(e) => format!("err:{}", e),
        };
        self.log.lock().push(entry);
        outcome
    }
}

#[test]
fn audit_filter_sees_success_and_failure() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (builder, _) = builder();
    let dispatcher = builder
        .filter(AuditFilter {
            log: Arc::clone(&log),
        })
        .build()
        .unwrap();

    dispatcher
        .execute("echo", &Call::new().with_argument("msg", "x"))
        .unwrap();
    dispatcher
        .execute("user.get", &Call::new().with_argument("id", "ghost"))
        .unwrap_err();
    // Never reaches the chain: resolution fails first
    dispatcher.execute("ghost", &Call::new()).unwrap_err();

    assert_eq!(
        *log.lock(),
        vec!["ok:1".to_string(), "err:UserNotFound: ghost".to_string()]
    );
}

#[test]
fn authentication_filter_short_circuits() {
    let (builder, repo) = builder();
    let dispatcher = builder
        .filter(filter_fn(|call, command, next| match call.session() {
            Some(_) => next.proceed(call, command),
            None => Err(Error::execution("Unauthenticated", "session required")),
        }))
        .build()
        .unwrap();
    let create = Call::new()
        .with_argument("id", "u3")
        .with_argument("name", "Linus");

    let err = dispatcher.execute("user.create", &create).unwrap_err();
    assert_eq!(err, Error::execution("Unauthenticated", "session required"));
    assert_eq!(repo.len(), 0);

    let ok = dispatcher
        .execute("user.create", &create.clone().with_session("admin"))
        .unwrap();
    assert_eq!(ok.get("created"), Some(&Value::Bool(true)));
    assert_eq!(repo.len(), 1);
}

#[test]
fn result_shaping_filters_compose_in_order() {
    let (builder, _) = builder();
    let dispatcher = builder
        .filter(filter_fn(|call, command, next| {
            let mut result = next.proceed(call, command)?;
            result.insert("outer", true);
            Ok(result)
        }))
        .filter(filter_fn(|call, command, next| {
            let mut result = next.proceed(call, command)?;
            result.insert("inner", true);
            Ok(result)
        }))
        .build()
        .unwrap();

    let result = dispatcher
        .execute("echo", &Call::new().with_argument("msg", "m"))
        .unwrap();

    assert_eq!(
        result.keys().collect::<Vec<_>>(),
        vec!["msg", "inner", "outer"]
    );
}
