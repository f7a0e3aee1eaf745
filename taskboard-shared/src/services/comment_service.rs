/// Comment service
///
/// Comments are append-only. Callers confirm the parent task exists before
/// creating one; storage still rejects orphans through its foreign key.

use uuid::Uuid;

use super::ServiceResult;
use crate::clock::SharedClock;
use crate::models::comment::{Comment, CreateComment};
use crate::store::SharedStore;

/// Business rules for comments
pub struct CommentService {
    store: SharedStore,
    clock: SharedClock,
}

impl CommentService {
    /// Creates the service
    pub fn new(store: SharedStore, clock: SharedClock) -> Self {
        Self { store, clock }
    }

    /// Appends a comment to a task
    pub async fn create_comment(&self, task_id: Uuid, data: CreateComment) -> ServiceResult<Comment> {
        let comment = Comment::new(task_id, data, self.clock.now());
        self.store.insert_comment(&comment).await?;

        tracing::debug!(comment_id = %comment.id, task_id = %task_id, "Comment created");
        Ok(comment)
    }

    /// Lists a task's comments, oldest first
    ///
    /// An unknown task yields an empty list.
    pub async fn list_comments_by_task(&self, task_id: Uuid) -> ServiceResult<Vec<Comment>> {
        Ok(self.store.comments_for_task(task_id).await?)
    }
}
