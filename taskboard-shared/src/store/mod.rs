/// Persistence gateway
///
/// The [`Store`] trait is the storage contract every service consumes. It
/// enforces column-level constraints (active-email uniqueness, foreign keys)
/// but no business rules.
///
/// # Implementations
///
/// - [`memory::MemoryStore`]: in-process maps behind a `tokio::sync::RwLock`
/// - [`postgres::PgStore`]: PostgreSQL via sqlx
///
/// # Example
///
/// ```
/// use taskboard_shared::store::{memory::MemoryStore, Store};
/// use taskboard_shared::models::user::{User, UserRole};
/// use chrono::Utc;
///
/// # async fn example() -> Result<(), taskboard_shared::store::StoreError> {
/// let store = MemoryStore::new();
/// let user = User::new("ada@example.com", "Ada", UserRole::Admin, Utc::now());
/// store.insert_user(&user).await?;
///
/// let found = store.find_active_user_by_email("ada@example.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{
    comment::Comment,
    task::Task,
    user::{User, UserSearch},
    Pagination,
};

/// Storage error
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Uniqueness constraint violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Referenced row does not exist
    #[error("Missing reference: {0}")]
    ForeignKey(String),

    /// Backend did not answer in time; safe to retry
    #[error("Storage timed out")]
    Timeout,

    /// Backend unreachable
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Stored data could not be decoded
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    /// Whether the caller may retry the operation
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Timeout | StoreError::Unavailable(_))
    }
}

/// Result alias for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence gateway contract
#[async_trait]
pub trait Store: Send + Sync {
    /// Finds a user by ID regardless of soft-delete state
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Finds the active user holding `email`, if any
    async fn find_active_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Inserts a user
    ///
    /// Fails with [`StoreError::Conflict`] when an active user already holds
    /// the email.
    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    /// Overwrites a user row by ID
    async fn update_user(&self, user: &User) -> StoreResult<()>;

    /// Scans active users matching `filter`, newest first
    async fn scan_users(&self, filter: &UserSearch, page: Pagination) -> StoreResult<Vec<User>>;

    /// Physically removes users, returning how many rows went away
    async fn delete_users(&self, ids: &[Uuid]) -> StoreResult<u64>;

    /// Finds a task by ID
    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;

    /// Inserts a task
    ///
    /// Fails with [`StoreError::ForeignKey`] when the assignee does not exist.
    async fn insert_task(&self, task: &Task) -> StoreResult<()>;

    /// Overwrites a task row by ID
    async fn update_task(&self, task: &Task) -> StoreResult<()>;

    /// Scans tasks, newest first
    async fn scan_tasks(&self, page: Pagination) -> StoreResult<Vec<Task>>;

    /// Inserts a comment
    ///
    /// Fails with [`StoreError::ForeignKey`] when the task does not exist.
    async fn insert_comment(&self, comment: &Comment) -> StoreResult<()>;

    /// Lists a task's comments, oldest first
    async fn comments_for_task(&self, task_id: Uuid) -> StoreResult<Vec<Comment>>;

    /// Verifies the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}

/// Shared store handle
pub type SharedStore = Arc<dyn Store>;
