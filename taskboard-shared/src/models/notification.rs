/// Notification model
///
/// Notifications are produced as a side effect of task operations. They come
/// in two shapes: a lifecycle event carrying a snapshot of the task, or a
/// free-text message sent manually to the assignee.
///
/// # JSON shape
///
/// ```json
/// {
///   "id": "uuid",
///   "taskId": "uuid",
///   "assigneeId": "uuid",
///   "sentAt": "2025-01-04T12:00:00Z",
///   "kind": "event",
///   "event": "task.updated",
///   "title": "Fix login bug",
///   "status": "done"
/// }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::{Task, TaskStatus};

/// Task lifecycle event tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskEvent {
    /// Task was created
    #[serde(rename = "task.created")]
    Created,

    /// Task was updated
    #[serde(rename = "task.updated")]
    Updated,

    /// Manual nudge for the assignee
    #[serde(rename = "task.notify")]
    Notify,
}

impl TaskEvent {
    /// Event name as emitted on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskEvent::Created => "task.created",
            TaskEvent::Updated => "task.updated",
            TaskEvent::Notify => "task.notify",
        }
    }
}

/// Notification contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NotificationBody {
    /// Lifecycle event with task snapshot
    Event {
        /// Event tag
        event: TaskEvent,

        /// Task title at the time of the event
        title: String,

        /// Task status at the time of the event
        status: TaskStatus,
    },

    /// Free-text message
    Message {
        /// Message text
        message: String,
    },
}

/// Notification record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification ID
    pub id: Uuid,

    /// Task the notification concerns
    pub task_id: Uuid,

    /// Recipient
    pub assignee_id: Uuid,

    /// Contents
    #[serde(flatten)]
    pub body: NotificationBody,

    /// When the notification was produced
    pub sent_at: DateTime<Utc>,
}

impl Notification {
    /// Builds an event notification from the task's current state
    pub fn event(task: &Task, event: TaskEvent, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id: task.id,
            assignee_id: task.assignee_id,
            body: NotificationBody::Event {
                event,
                title: task.title.clone(),
                status: task.status,
            },
            sent_at: now,
        }
    }

    /// Builds a free-text notification for the task's assignee
    pub fn message(task: &Task, message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id: task.id,
            assignee_id: task.assignee_id,
            body: NotificationBody::Message {
                message: message.into(),
            },
            sent_at: now,
        }
    }

    /// Event tag, if this is an event notification
    pub fn event_tag(&self) -> Option<TaskEvent> {
        match &self.body {
            NotificationBody::Event { event, .. } => Some(*event),
            NotificationBody::Message { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::CreateTask;

    fn task() -> Task {
        Task::new(
            CreateTask {
                title: "Ship it".to_string(),
                description: "".to_string(),
                assignee_id: Uuid::new_v4(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_event_notification_serializes_flat() {
        let task = task();
        let n = Notification::event(&task, TaskEvent::Created, Utc::now());
        let json = serde_json::to_value(&n).unwrap();

        assert_eq!(json["kind"], "event");
        assert_eq!(json["event"], "task.created");
        assert_eq!(json["title"], "Ship it");
        assert_eq!(json["status"], "todo");
        assert_eq!(json["taskId"], task.id.to_string());
    }

    #[test]
    fn test_message_notification() {
        let task = task();
        let n = Notification::message(&task, "please review", Utc::now());
        let json = serde_json::to_value(&n).unwrap();

        assert_eq!(json["kind"], "message");
        assert_eq!(json["message"], "please review");
        assert_eq!(n.event_tag(), None);
        assert_eq!(n.assignee_id, task.assignee_id);
    }
}
