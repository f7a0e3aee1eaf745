/// Task service
///
/// Owns task creation, partial updates and derived priority. Every
/// successful create or update emits a notification after the write lands.
///
/// Concurrent updates to the same task are last-write-wins: the update reads
/// the current row, merges the patch and writes the whole row back.

use std::sync::Arc;
use uuid::Uuid;

use super::ServiceResult;
use crate::clock::SharedClock;
use crate::models::{
    notification::TaskEvent,
    task::{CreateTask, Task, TaskPriority, UpdateTask},
    Pagination,
};
use crate::notifications::NotificationDispatcher;
use crate::store::SharedStore;

/// Business rules for tasks
pub struct TaskService {
    store: SharedStore,
    clock: SharedClock,
    notifier: Arc<NotificationDispatcher>,
}

impl TaskService {
    /// Creates the service
    pub fn new(store: SharedStore, clock: SharedClock, notifier: Arc<NotificationDispatcher>) -> Self {
        Self {
            store,
            clock,
            notifier,
        }
    }

    /// Creates a task in `todo` state and emits `task.created`
    pub async fn create_task(&self, data: CreateTask) -> ServiceResult<Task> {
        let task = Task::new(data, self.clock.now());
        self.store.insert_task(&task).await?;

        tracing::info!(task_id = %task.id, assignee_id = %task.assignee_id, "Task created");

        self.notifier.notify_task_event(&task, TaskEvent::Created).await;
        Ok(task)
    }

    /// Looks a task up by ID
    pub async fn get_task_by_id(&self, id: Uuid) -> ServiceResult<Option<Task>> {
        Ok(self.store.find_task(id).await?)
    }

    /// Lists tasks, newest first
    pub async fn list_tasks(&self, page: Pagination) -> ServiceResult<Vec<Task>> {
        Ok(self.store.scan_tasks(page).await?)
    }

    /// Applies a partial update and emits `task.updated`
    ///
    /// Returns `None` (and emits nothing) if the task does not exist.
    pub async fn update_task(&self, id: Uuid, update: UpdateTask) -> ServiceResult<Option<Task>> {
        let Some(existing) = self.store.find_task(id).await? else {
            return Ok(None);
        };

        let updated = existing.merged(update, self.clock.now());
        self.store.update_task(&updated).await?;

        tracing::info!(task_id = %id, status = %updated.status, "Task updated");

        self.notifier.notify_task_event(&updated, TaskEvent::Updated).await;
        Ok(Some(updated))
    }

    /// Derives the task's priority from its age
    ///
    /// Returns `None` if the task does not exist.
    pub async fn get_task_priority(&self, id: Uuid) -> ServiceResult<Option<TaskPriority>> {
        let now = self.clock.now();
        Ok(self
            .store
            .find_task(id)
            .await?
            .map(|task| TaskPriority::from_age(task.age(now))))
    }
}
