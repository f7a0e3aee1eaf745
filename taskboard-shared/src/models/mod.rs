/// Domain models for Taskboard
///
/// # Models
///
/// - `user`: User accounts with soft-delete
/// - `task`: Tasks, partial updates and derived priority
/// - `comment`: Append-only task comments
/// - `notification`: Task event and message notifications
///
/// # Example
///
/// ```
/// use taskboard_shared::models::{Pagination, task::{CreateTask, Task}};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let task = Task::new(
///     CreateTask {
///         title: "Write docs".to_string(),
///         description: "README and examples".to_string(),
///         assignee_id: Uuid::new_v4(),
///     },
///     Utc::now(),
/// );
///
/// let page = Pagination::clamped(Some(500), None);
/// assert_eq!(page.limit, Pagination::MAX_LIMIT);
/// ```

pub mod comment;
pub mod notification;
pub mod task;
pub mod user;

use serde::{Deserialize, Serialize};

/// Page window for listing operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of records
    pub limit: i64,

    /// Number of records to skip
    pub offset: i64,
}

impl Pagination {
    /// Largest page a caller may request
    pub const MAX_LIMIT: i64 = 100;

    /// Page size when the caller gives none
    pub const DEFAULT_LIMIT: i64 = 50;

    /// Builds a page window
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }

    /// Builds a page window from caller input, clamped to sane bounds
    ///
    /// `limit` is clamped to `1..=MAX_LIMIT`, `offset` to `>= 0`.
    pub fn clamped(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, Self::MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }

    /// Applies the window to an ordered iterator
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset.max(0) as usize)
            .take(self.limit.max(0) as usize)
            .collect()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_clamped() {
        assert_eq!(Pagination::clamped(None, None), Pagination::new(50, 0));
        assert_eq!(Pagination::clamped(Some(1000), Some(-5)), Pagination::new(100, 0));
        assert_eq!(Pagination::clamped(Some(0), Some(20)), Pagination::new(1, 20));
    }

    #[test]
    fn test_pagination_apply() {
        let page = Pagination::new(2, 1);
        assert_eq!(page.apply(vec![1, 2, 3, 4]), vec![2, 3]);
    }
}
