/// Notification dispatcher
///
/// Builds notification records from task state, appends them to an in-memory
/// history and hands them to a [`NotificationTransport`] on a spawned task.
/// Delivery is fire-and-forget: a failing transport is logged and never
/// surfaces to the task operation that triggered it.
///
/// # Ordering
///
/// Task services persist first and dispatch second, so a notification always
/// describes a state that was durably written.
///
/// # Example
///
/// ```
/// use taskboard_shared::clock::SystemClock;
/// use taskboard_shared::notifications::{NotificationDispatcher, transport::LogTransport};
/// use taskboard_shared::models::{notification::TaskEvent, task::{CreateTask, Task}};
/// use chrono::Utc;
/// use std::sync::Arc;
/// use uuid::Uuid;
///
/// # async fn example() {
/// let dispatcher = NotificationDispatcher::new(Arc::new(LogTransport), Arc::new(SystemClock));
/// let task = Task::new(
///     CreateTask { title: "t".into(), description: "d".into(), assignee_id: Uuid::new_v4() },
///     Utc::now(),
/// );
///
/// let payload = dispatcher.build_payload(&task, TaskEvent::Created);
/// dispatcher.dispatch(payload).await;
/// assert_eq!(dispatcher.history(task.id).await.len(), 1);
/// # }
/// ```

pub mod transport;

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::clock::SharedClock;
use crate::models::{
    notification::{Notification, TaskEvent},
    task::Task,
};
use transport::NotificationTransport;

/// Builds, records and delivers task notifications
///
/// History is kept per task for the life of the process and is never
/// pruned.
pub struct NotificationDispatcher {
    transport: Arc<dyn NotificationTransport>,
    clock: SharedClock,
    log: RwLock<HashMap<Uuid, Vec<Notification>>>,
}

impl NotificationDispatcher {
    /// Creates a dispatcher with an empty history
    pub fn new(transport: Arc<dyn NotificationTransport>, clock: SharedClock) -> Self {
        Self {
            transport,
            clock,
            log: RwLock::new(HashMap::new()),
        }
    }

    /// Builds an event notification from the task's current state
    pub fn build_payload(&self, task: &Task, event: TaskEvent) -> Notification {
        Notification::event(task, event, self.clock.now())
    }

    /// Records a notification and delivers it in the background
    ///
    /// Returns as soon as the record is appended. Delivery failures are
    /// logged and dropped.
    pub async fn dispatch(&self, notification: Notification) {
        self.log
            .write()
            .await
            .entry(notification.task_id)
            .or_default()
            .push(notification.clone());

        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            if let Err(e) = transport.deliver(&notification).await {
                tracing::warn!(
                    error = %e,
                    transport = transport.name(),
                    notification_id = %notification.id,
                    task_id = %notification.task_id,
                    "Notification delivery failed"
                );
            }
        });
    }

    /// Builds and dispatches an event notification
    pub async fn notify_task_event(&self, task: &Task, event: TaskEvent) -> Notification {
        let notification = self.build_payload(task, event);
        self.dispatch(notification.clone()).await;
        notification
    }

    /// Sends a free-text message to the task's assignee
    pub async fn notify_assignee(&self, task: &Task, message: &str) -> Notification {
        let notification = Notification::message(task, message, self.clock.now());
        self.dispatch(notification.clone()).await;
        notification
    }

    /// Notification history for a task, newest first
    pub async fn history(&self, task_id: Uuid) -> Vec<Notification> {
        self.log
            .read()
            .await
            .get(&task_id)
            .map(|entries| entries.iter().rev().cloned().collect())
            .unwrap_or_default()
    }
}
