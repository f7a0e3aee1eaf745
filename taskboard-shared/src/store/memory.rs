/// In-memory store
///
/// Keeps every table in a `Vec` behind a single `tokio::sync::RwLock`, in
/// insertion order. Used when no database is configured and by the test
/// suites. Constraints match the PostgreSQL schema.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::{
    comment::Comment,
    task::Task,
    user::{User, UserSearch},
    Pagination,
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    tasks: Vec<Task>,
    comments: Vec<Comment>,
}

/// Store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

/// Sorts newest first, keeping insertion order stable for equal timestamps
/// with later inserts first.
fn newest_first<T: Clone>(rows: &[T], created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) -> Vec<T> {
    let mut out: Vec<T> = rows.iter().rev().cloned().collect();
    out.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    out
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_active_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.is_active() && u.email == email)
            .cloned())
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.id == user.id) {
            return Err(StoreError::Conflict(format!("user id {} exists", user.id)));
        }
        if user.is_active()
            && tables
                .users
                .iter()
                .any(|u| u.is_active() && u.email == user.email)
        {
            return Err(StoreError::Conflict(format!(
                "active user with email '{}' exists",
                user.email
            )));
        }

        tables.users.push(user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        if user.is_active()
            && tables
                .users
                .iter()
                .any(|u| u.id != user.id && u.is_active() && u.email == user.email)
        {
            return Err(StoreError::Conflict(format!(
                "active user with email '{}' exists",
                user.email
            )));
        }

        if let Some(row) = tables.users.iter_mut().find(|u| u.id == user.id) {
            *row = user.clone();
        }
        Ok(())
    }

    async fn scan_users(&self, filter: &UserSearch, page: Pagination) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        let matching: Vec<User> = tables
            .users
            .iter()
            .filter(|u| u.is_active() && filter.matches(u))
            .cloned()
            .collect();

        Ok(page.apply(newest_first(&matching, |u| u.created_at)))
    }

    async fn delete_users(&self, ids: &[Uuid]) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;

        if let Some(task) = tables.tasks.iter().find(|t| ids.contains(&t.assignee_id)) {
            return Err(StoreError::ForeignKey(format!(
                "user {} is assigned to task {}",
                task.assignee_id, task.id
            )));
        }

        let before = tables.users.len();
        tables.users.retain(|u| !ids.contains(&u.id));
        Ok((before - tables.users.len()) as u64)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn insert_task(&self, task: &Task) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        if !tables.users.iter().any(|u| u.id == task.assignee_id) {
            return Err(StoreError::ForeignKey(format!(
                "assignee {} does not exist",
                task.assignee_id
            )));
        }
        if tables.tasks.iter().any(|t| t.id == task.id) {
            return Err(StoreError::Conflict(format!("task id {} exists", task.id)));
        }

        tables.tasks.push(task.clone());
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        if !tables.users.iter().any(|u| u.id == task.assignee_id) {
            return Err(StoreError::ForeignKey(format!(
                "assignee {} does not exist",
                task.assignee_id
            )));
        }

        if let Some(row) = tables.tasks.iter_mut().find(|t| t.id == task.id) {
            *row = task.clone();
        }
        Ok(())
    }

    async fn scan_tasks(&self, page: Pagination) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;
        Ok(page.apply(newest_first(&tables.tasks, |t| t.created_at)))
    }

    async fn insert_comment(&self, comment: &Comment) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        if !tables.tasks.iter().any(|t| t.id == comment.task_id) {
            return Err(StoreError::ForeignKey(format!(
                "task {} does not exist",
                comment.task_id
            )));
        }

        tables.comments.push(comment.clone());
        Ok(())
    }

    async fn comments_for_task(&self, task_id: Uuid) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|c| c.task_id == task_id)
            .cloned()
            .collect();
        // stable sort keeps insertion order for equal timestamps
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::CreateTask;
    use crate::models::user::UserRole;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_active_email_unique() {
        let store = MemoryStore::new();
        let first = User::new("dup@example.com", "First", UserRole::Member, Utc::now());
        store.insert_user(&first).await.unwrap();

        let second = User::new("dup@example.com", "Second", UserRole::Member, Utc::now());
        let err = store.insert_user(&second).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let mut deleted = first.clone();
        deleted.deleted_at = Some(Utc::now());
        store.update_user(&deleted).await.unwrap();
        store.insert_user(&second).await.unwrap();
    }

    #[tokio::test]
    async fn test_scan_users_newest_first_active_only() {
        let store = MemoryStore::new();
        let t0 = Utc::now();
        let old = User::new("old@example.com", "Old", UserRole::Member, t0);
        let new = User::new("new@example.com", "New", UserRole::Member, t0 + Duration::seconds(5));
        let mut gone = User::new("gone@example.com", "Gone", UserRole::Member, t0 + Duration::seconds(9));
        gone.deleted_at = Some(t0 + Duration::seconds(10));

        store.insert_user(&old).await.unwrap();
        store.insert_user(&new).await.unwrap();
        store.insert_user(&gone).await.unwrap();

        let users = store
            .scan_users(&UserSearch::All, Pagination::default())
            .await
            .unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["New", "Old"]);
    }

    #[tokio::test]
    async fn test_task_requires_assignee() {
        let store = MemoryStore::new();
        let task = Task::new(
            CreateTask {
                title: "t".into(),
                description: "d".into(),
                assignee_id: Uuid::new_v4(),
            },
            Utc::now(),
        );
        let err = store.insert_task(&task).await.unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey(_)));
    }

    #[tokio::test]
    async fn test_delete_users_counts_only_present_rows() {
        let store = MemoryStore::new();
        let user = User::new("a@example.com", "A", UserRole::Member, Utc::now());
        store.insert_user(&user).await.unwrap();

        let removed = store.delete_users(&[user.id, Uuid::new_v4()]).await.unwrap();
        assert_eq!(removed, 1);
        assert!(store.find_user(user.id).await.unwrap().is_none());
    }
}
