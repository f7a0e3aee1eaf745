/// Database layer for Taskboard
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: Embedded schema migrations
///
/// The PostgreSQL implementation of the persistence gateway lives in
/// [`crate::store::postgres`].

pub mod migrations;
pub mod pool;
