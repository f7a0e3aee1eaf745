/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: User signup, lookup, search and deletion
/// - `tasks`: Task lifecycle and priority
/// - `comments`: Task comments
/// - `notifications`: Task notification history and manual notify

pub mod comments;
pub mod health;
pub mod notifications;
pub mod tasks;
pub mod users;
