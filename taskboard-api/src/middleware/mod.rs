/// Middleware modules for the API server
///
/// - [`rate_limit`]: Per-client fixed-window admission
/// - [`auth`]: Bearer token gate for mutating routes

pub mod auth;
pub mod rate_limit;
