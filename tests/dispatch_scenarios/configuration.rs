//! Dispatchers configured from `dispatch.toml`.

use localvm::CONFIG_FILE_NAME;
use tempfile::TempDir;

use crate::common::*;

#[test]
fn dispatcher_from_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "cache_capacity = 1\nlog_calls = false\n").unwrap();

    let config = DispatchConfig::from_file(&path).unwrap();
    let (builder, _) = builder();
    let dispatcher = builder.config(config).build().unwrap();

    dispatcher
        .execute("echo", &Call::new().with_argument("msg", "a"))
        .unwrap();
    dispatcher
        .execute("user.get", &Call::new().with_argument("id", "x"))
        .unwrap_err();

    // Capacity 1: the second lookup evicted the first
    let stats = dispatcher.cache_stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.evictions, 1);
}

#[test]
fn default_config_file_is_usable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    DispatchConfig::write_default_if_missing(&path).unwrap();
    let config = DispatchConfig::from_file(&path).unwrap();
    assert_eq!(config, DispatchConfig::default());

    let (builder, _) = builder();
    let dispatcher = builder.config(config).build().unwrap();
    let result = dispatcher
        .execute("echo", &Call::new().with_argument("msg", "ok"))
        .unwrap();
    assert_eq!(result.get("msg"), Some(&Value::from("ok")));
}
