//! Dispatch scenarios as a transport layer would drive them.

use crate::common::*;

#[test]
fn echo_returns_message() {
    let (dispatcher, _) = dispatcher();

    let result = dispatcher
        .execute("echo", &Call::new().with_argument("msg", "hi"))
        .unwrap();

    assert_eq!(Value::from(result), serde_json::json!({ "msg": "hi" }));
}

#[test]
fn unknown_command_is_not_available() {
    let (dispatcher, _) = dispatcher();

    let err = dispatcher.execute("unknown", &Call::new()).unwrap_err();

    assert_eq!(
        err,
        Error::CommandNotAvailable {
            command: "unknown".to_string()
        }
    );
}

#[test]
fn absent_call_is_invalid() {
    let (dispatcher, _) = dispatcher();
    assert!(matches!(
        dispatcher.execute("echo", None),
        Err(Error::InvalidCall { .. })
    ));
}

#[test]
fn non_command_symbol_looks_like_unknown_command() {
    let (dispatcher, _) = dispatcher();

    let repo = dispatcher.execute("user.repo", &Call::new()).unwrap_err();
    let missing = dispatcher.execute("user.remove", &Call::new()).unwrap_err();

    assert_eq!(repo, Error::not_available("user.repo"));
    assert_eq!(missing, Error::not_available("user.remove"));
    // The wire form reveals nothing beyond the requested name
    assert_eq!(
        serde_json::to_value(&repo).unwrap(),
        serde_json::json!({ "CommandNotAvailable": { "command": "user.repo" } })
    );
}

#[test]
fn commands_share_state_through_container() {
    let (dispatcher, repo) = dispatcher();

    let created = dispatcher
        .execute(
            "user.create",
            &Call::new()
                .with_argument("id", "u1")
                .with_argument("name", "Ada"),
        )
        .unwrap();
    assert_eq!(
        serde_json::to_string(&created).unwrap(),
        r#"{"id":"u1","created":true}"#
    );
    assert_eq!(repo.len(), 1);

    let fetched = dispatcher
        .execute("user.get", &Call::new().with_argument("id", "u1"))
        .unwrap();
    assert_eq!(
        serde_json::to_string(&fetched).unwrap(),
        r#"{"id":"u1","name":"Ada"}"#
    );
}

#[test]
fn domain_errors_reach_caller_verbatim() {
    let (dispatcher, _) = dispatcher();
    let call = Call::new()
        .with_argument("id", "u1")
        .with_argument("name", "Ada");

    dispatcher.execute("user.create", &call).unwrap();
    let err = dispatcher.execute("user.create", &call).unwrap_err();
    assert_eq!(err, Error::execution("UserExists", "u1"));

    let err = dispatcher
        .execute("user.get", &Call::new().with_argument("id", "nobody"))
        .unwrap_err();
    assert_eq!(err, Error::execution("UserNotFound", "nobody"));

    let err = dispatcher.execute("user.get", &Call::new()).unwrap_err();
    assert_eq!(err, Error::execution("MissingArgument", "id"));
}

#[test]
fn batch_requests_keep_their_order() {
    let (dispatcher, _) = dispatcher();

    let results = dispatcher.execute_many(&[
        (
            "user.create",
            Call::new()
                .with_argument("id", "u2")
                .with_argument("name", "Grace"),
        ),
        ("user.get", Call::new().with_argument("id", "u2")),
        ("user.delete", Call::new()),
    ]);

    assert!(results[0].is_ok());
    assert_eq!(
        results[1].as_ref().unwrap().get("name"),
        Some(&Value::from("Grace"))
    );
    assert_eq!(results[2], Err(Error::not_available("user.delete")));
}

#[test]
fn concurrent_echo_calls_do_not_interfere() {
    use std::sync::Arc;
    use std::thread;

    let (dispatcher, _) = dispatcher();
    let dispatcher = Arc::new(dispatcher);

    let handles: Vec<_> = (0..100)
        .map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                let result = dispatcher
                    .execute("echo", &Call::new().with_argument("msg", i))
                    .unwrap();
                (i, result)
            })
        })
        .collect();

    for handle in handles {
        let (i, result) = handle.join().unwrap();
        assert_eq!(Value::from(result), serde_json::json!({ "msg": i }));
    }
}
