//! # Taskboard Shared Library
//!
//! Domain types, storage, business services and cross-cutting utilities used
//! by the Taskboard API server.
//!
//! ## Module Organization
//!
//! - `models`: Users, tasks, comments, notifications and pagination
//! - `store`: Persistence gateway trait with in-memory and PostgreSQL backends
//! - `services`: User, task and comment business rules
//! - `notifications`: Notification history and delivery transports
//! - `ratelimit`: Fixed-window request admission
//! - `auth`: Bearer token issuing and verification
//! - `clock`: Injectable time source
//! - `db`: PostgreSQL pool and migrations

pub mod auth;
pub mod clock;
pub mod db;
pub mod models;
pub mod notifications;
pub mod ratelimit;
pub mod services;
pub mod store;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
