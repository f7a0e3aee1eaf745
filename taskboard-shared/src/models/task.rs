/// Task model
///
/// Tasks move through a simple lifecycle and are never deleted.
///
/// # State Machine
///
/// ```text
/// todo → in_progress → done
/// ```
///
/// Updates are partial: any subset of title, description, status and
/// assignee may be supplied, omitted fields keep their prior values.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY,
///     title TEXT NOT NULL,
///     description TEXT NOT NULL,
///     status TEXT NOT NULL CHECK (status IN ('todo', 'in_progress', 'done')),
///     assignee_id UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL,
///     updated_at TIMESTAMPTZ NOT NULL
/// );
/// ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Task lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started (initial state)
    #[default]
    Todo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// Converts status to string for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(format!("unknown task status '{}'", other)),
        }
    }
}

/// Task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Short title
    pub title: String,

    /// Longer description
    pub description: String,

    /// Lifecycle status
    pub status: TaskStatus,

    /// User the task is assigned to
    pub assignee_id: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated (never before `created_at`)
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Title
    pub title: String,

    /// Description
    pub description: String,

    /// Assignee
    pub assignee_id: Uuid,
}

/// Partial update for a task
///
/// All fields are optional. Only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New assignee
    pub assignee_id: Option<Uuid>,
}

impl UpdateTask {
    /// Whether the update carries no fields
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.assignee_id.is_none()
    }
}

impl Task {
    /// Builds a new task in `todo` state with a generated ID
    pub fn new(data: CreateTask, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            status: TaskStatus::Todo,
            assignee_id: data.assignee_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges a partial update over this task
    ///
    /// `id` and `created_at` are never touched. `updated_at` is always
    /// refreshed, clamped so it never precedes `created_at`.
    pub fn merged(&self, update: UpdateTask, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            title: update.title.unwrap_or_else(|| self.title.clone()),
            description: update.description.unwrap_or_else(|| self.description.clone()),
            status: update.status.unwrap_or(self.status),
            assignee_id: update.assignee_id.unwrap_or(self.assignee_id),
            created_at: self.created_at,
            updated_at: now.max(self.created_at),
        }
    }

    /// Age of the task at `now`
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.created_at
    }
}

/// Derived task priority
///
/// Priority is not stored; it is a function of the task's age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Younger than one day
    Low,

    /// One to three days old
    Medium,

    /// Three to seven days old
    High,

    /// Older than seven days
    Urgent,
}

impl TaskPriority {
    /// Computes priority from task age
    pub fn from_age(age: Duration) -> Self {
        if age < Duration::days(1) {
            TaskPriority::Low
        } else if age < Duration::days(3) {
            TaskPriority::Medium
        } else if age <= Duration::days(7) {
            TaskPriority::High
        } else {
            TaskPriority::Urgent
        }
    }

    /// Converts priority to string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(now: DateTime<Utc>) -> Task {
        Task::new(
            CreateTask {
                title: "Fix login bug".to_string(),
                description: "Users cannot log in with email".to_string(),
                assignee_id: Uuid::new_v4(),
            },
            now,
        )
    }

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Todo.as_str(), "todo");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::Done.as_str(), "done");
        assert_eq!("in_progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert!("pending".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_task_status_serde() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn test_new_task_starts_todo() {
        let now = Utc::now();
        let task = sample(now);
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_merged_keeps_omitted_fields() {
        let created = Utc::now();
        let task = sample(created);
        let later = created + Duration::minutes(5);

        let merged = task.merged(
            UpdateTask {
                status: Some(TaskStatus::Done),
                ..Default::default()
            },
            later,
        );

        assert_eq!(merged.id, task.id);
        assert_eq!(merged.title, task.title);
        assert_eq!(merged.description, task.description);
        assert_eq!(merged.assignee_id, task.assignee_id);
        assert_eq!(merged.created_at, task.created_at);
        assert_eq!(merged.status, TaskStatus::Done);
        assert_eq!(merged.updated_at, later);
    }

    #[test]
    fn test_merged_never_precedes_creation() {
        let created = Utc::now();
        let task = sample(created);
        let merged = task.merged(UpdateTask::default(), created - Duration::seconds(10));
        assert_eq!(merged.updated_at, created);
    }

    #[test]
    fn test_priority_boundaries() {
        assert_eq!(TaskPriority::from_age(Duration::hours(23)), TaskPriority::Low);
        assert_eq!(TaskPriority::from_age(Duration::days(1)), TaskPriority::Medium);
        assert_eq!(TaskPriority::from_age(Duration::hours(71)), TaskPriority::Medium);
        assert_eq!(TaskPriority::from_age(Duration::days(3)), TaskPriority::High);
        assert_eq!(TaskPriority::from_age(Duration::days(7)), TaskPriority::High);
        assert_eq!(
            TaskPriority::from_age(Duration::days(7) + Duration::seconds(1)),
            TaskPriority::Urgent
        );
    }

    #[test]
    fn test_update_task_is_empty() {
        assert!(UpdateTask::default().is_empty());
        assert!(!UpdateTask {
            title: Some("x".into()),
            ..Default::default()
        }
        .is_empty());
    }
}
