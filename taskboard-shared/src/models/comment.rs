/// Comment model
///
/// Comments are append-only children of a task: created once, never updated
/// or deleted, and listed oldest-first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment on a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique comment ID
    pub id: Uuid,

    /// Task the comment belongs to
    pub task_id: Uuid,

    /// Author of the comment
    pub author_id: Uuid,

    /// Comment text
    pub body: String,

    /// When the comment was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComment {
    /// Author
    pub author_id: Uuid,

    /// Comment text
    pub body: String,
}

impl Comment {
    /// Builds a new comment with a generated ID
    pub fn new(task_id: Uuid, data: CreateComment, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            author_id: data.author_id,
            body: data.body,
            created_at: now,
        }
    }
}
