//! End-to-end Dispatch Tests
//!
//! Tests for the localvm facade crate, driving a small application the way a
//! transport layer would:
//! - Spec scenarios (echo, unknown command, absent call)
//! - Commands sharing state through container bindings
//! - Middleware composition (auditing, authentication, result shaping)
//! - Configuration loaded from `dispatch.toml`

mod common;

mod configuration;
mod middleware;
mod scenarios;
