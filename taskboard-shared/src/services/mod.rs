/// Domain services
///
/// Each service owns the business rules for one entity and talks to storage
/// only through the [`crate::store::Store`] trait.
///
/// # Error policy
///
/// - "Not found" is never an error: lookups return `Option`, deletes return
///   `bool`.
/// - [`ServiceError::Conflict`] is the only business-rule failure.
/// - Storage failures pass through as [`ServiceError::Storage`].

pub mod comment_service;
pub mod task_service;
pub mod user_service;

pub use comment_service::CommentService;
pub use task_service::TaskService;
pub use user_service::{DeletionPolicy, UserService};

use crate::store::StoreError;

/// Service-layer error
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Uniqueness rule violated
    #[error("{0}")]
    Conflict(String),

    /// Storage failed
    #[error(transparent)]
    Storage(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Storage(other),
        }
    }
}

/// Result alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
