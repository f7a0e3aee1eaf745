/// Integration tests for the task service and its notifications

use chrono::Duration;
use std::sync::Arc;
use taskboard_shared::clock::ManualClock;
use taskboard_shared::models::notification::TaskEvent;
use taskboard_shared::models::task::{CreateTask, TaskPriority, TaskStatus, UpdateTask};
use taskboard_shared::models::user::{CreateUser, UserRole};
use taskboard_shared::models::Pagination;
use taskboard_shared::notifications::{transport::LogTransport, NotificationDispatcher};
use taskboard_shared::services::{DeletionPolicy, ServiceError, TaskService, UserService};
use taskboard_shared::store::{memory::MemoryStore, StoreError};
use uuid::Uuid;

struct Fixture {
    tasks: TaskService,
    notifier: Arc<NotificationDispatcher>,
    clock: Arc<ManualClock>,
    assignee: Uuid,
}

async fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::default());
    let notifier = Arc::new(NotificationDispatcher::new(Arc::new(LogTransport), clock.clone()));

    let users = UserService::new(store.clone(), clock.clone(), DeletionPolicy::Soft);
    let assignee = users
        .create_user(CreateUser {
            email: "owner@example.com".into(),
            name: "Owner".into(),
            role: UserRole::Member,
        })
        .await
        .unwrap()
        .id;

    Fixture {
        tasks: TaskService::new(store, clock.clone(), notifier.clone()),
        notifier,
        clock,
        assignee,
    }
}

fn new_task(assignee_id: Uuid) -> CreateTask {
    CreateTask {
        title: "Write report".into(),
        description: "Quarterly numbers".into(),
        assignee_id,
    }
}

#[tokio::test]
async fn test_create_task_starts_todo_and_notifies() {
    let fx = fixture().await;

    let task = fx.tasks.create_task(new_task(fx.assignee)).await.unwrap();
    assert_eq!(task.status, TaskStatus::Todo);
    assert_eq!(task.created_at, task.updated_at);

    let history = fx.notifier.history(task.id).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].event_tag(), Some(TaskEvent::Created));
    assert_eq!(history[0].assignee_id, fx.assignee);

    assert_eq!(fx.tasks.get_task_by_id(task.id).await.unwrap(), Some(task));
}

#[tokio::test]
async fn test_create_task_with_unknown_assignee_fails() {
    let fx = fixture().await;

    let result = fx.tasks.create_task(new_task(Uuid::new_v4())).await;
    assert!(matches!(
        result,
        Err(ServiceError::Storage(StoreError::ForeignKey(_)))
    ));
    assert!(fx.tasks.list_tasks(Pagination::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_status_update_preserves_other_fields() {
    let fx = fixture().await;
    let task = fx.tasks.create_task(new_task(fx.assignee)).await.unwrap();

    fx.clock.advance(Duration::minutes(10));
    let updated = fx
        .tasks
        .update_task(
            task.id,
            UpdateTask {
                status: Some(TaskStatus::InProgress),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(updated.title, task.title);
    assert_eq!(updated.description, task.description);
    assert_eq!(updated.assignee_id, task.assignee_id);
    assert_eq!(updated.created_at, task.created_at);
    assert!(updated.updated_at > task.updated_at);

    let history = fx.notifier.history(task.id).await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].event_tag(), Some(TaskEvent::Updated));
}

#[tokio::test]
async fn test_update_missing_task_emits_nothing() {
    let fx = fixture().await;
    let missing = Uuid::new_v4();

    let result = fx
        .tasks
        .update_task(
            missing,
            UpdateTask {
                title: Some("nope".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(result.is_none());
    assert!(fx.notifier.history(missing).await.is_empty());
}

#[tokio::test]
async fn test_last_write_wins() {
    let fx = fixture().await;
    let task = fx.tasks.create_task(new_task(fx.assignee)).await.unwrap();

    for title in ["first", "second"] {
        fx.tasks
            .update_task(
                task.id,
                UpdateTask {
                    title: Some(title.into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    let stored = fx.tasks.get_task_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "second");
}

#[tokio::test]
async fn test_priority_tracks_age() {
    let fx = fixture().await;
    let task = fx.tasks.create_task(new_task(fx.assignee)).await.unwrap();

    assert_eq!(
        fx.tasks.get_task_priority(task.id).await.unwrap(),
        Some(TaskPriority::Low)
    );

    fx.clock.advance(Duration::days(2));
    assert_eq!(
        fx.tasks.get_task_priority(task.id).await.unwrap(),
        Some(TaskPriority::Medium)
    );

    fx.clock.advance(Duration::days(3));
    assert_eq!(
        fx.tasks.get_task_priority(task.id).await.unwrap(),
        Some(TaskPriority::High)
    );

    fx.clock.advance(Duration::days(10));
    assert_eq!(
        fx.tasks.get_task_priority(task.id).await.unwrap(),
        Some(TaskPriority::Urgent)
    );

    assert!(fx.tasks.get_task_priority(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_tasks_newest_first() {
    let fx = fixture().await;
    let older = fx.tasks.create_task(new_task(fx.assignee)).await.unwrap();
    fx.clock.advance(Duration::seconds(30));
    let newer = fx.tasks.create_task(new_task(fx.assignee)).await.unwrap();

    let listed = fx.tasks.list_tasks(Pagination::default()).await.unwrap();
    let ids: Vec<_> = listed.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
}
