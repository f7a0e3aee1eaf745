/// PostgreSQL store
///
/// Implements the persistence gateway on top of a sqlx `PgPool`. The schema
/// lives in `migrations/` and is applied with
/// [`crate::db::migrations::run_migrations`].
///
/// Active-email uniqueness is enforced by a partial unique index, so a
/// soft-deleted user's email can be inserted again.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskboard_shared::store::{postgres::PgStore, Store};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// let store = PgStore::new(pool);
/// store.ping().await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::{
    comment::Comment,
    task::Task,
    user::{User, UserSearch},
    Pagination,
};

/// Store backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Borrows the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    role: String,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            email: row.email,
            name: row.name,
            role: row.role.parse().map_err(StoreError::Corrupt)?,
            created_at: row.created_at,
            deleted_at: row.deleted_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    description: String,
    status: String,
    assignee_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = StoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Task {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status.parse().map_err(StoreError::Corrupt)?,
            assignee_id: row.assignee_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    task_id: Uuid,
    author_id: Uuid,
    body: String,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            task_id: row.task_id,
            author_id: row.author_id,
            body: row.body,
            created_at: row.created_at,
        }
    }
}

/// Maps sqlx errors onto the storage taxonomy
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => StoreError::Timeout,
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                StoreError::Unavailable(err.to_string())
            }
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                match db_err.code().as_deref() {
                    // unique_violation
                    Some("23505") => StoreError::Conflict(format!("Constraint violation: {}", constraint)),
                    // foreign_key_violation
                    Some("23503") => StoreError::ForeignKey(format!("Constraint violation: {}", constraint)),
                    _ => StoreError::Database(db_err.to_string()),
                }
            }
            other => StoreError::Database(other.to_string()),
        }
    }
}

/// Builds an ILIKE pattern matching `needle` as a literal substring
fn contains_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

const USER_COLUMNS: &str = "id, email, name, role, created_at, deleted_at";
const TASK_COLUMNS: &str = "id, title, description, status, assignee_id, created_at, updated_at";

#[async_trait]
impl Store for PgStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_active_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1 AND deleted_at IS NULL",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, role, created_at, deleted_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.deleted_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_user(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET email = $2, name = $3, role = $4, deleted_at = $5
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(user.deleted_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn scan_users(&self, filter: &UserSearch, page: Pagination) -> StoreResult<Vec<User>> {
        if filter.is_blank_query() {
            return Ok(Vec::new());
        }

        let (any, name, email) = match filter {
            UserSearch::All => (None, None, None),
            UserSearch::Query(q) => (Some(contains_pattern(q.trim())), None, None),
            UserSearch::Fields { name, email } => (
                None,
                name.as_deref().map(contains_pattern),
                email.as_deref().map(contains_pattern),
            ),
        };

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {}
            FROM users
            WHERE deleted_at IS NULL
              AND ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1)
              AND ($2::text IS NULL OR name ILIKE $2)
              AND ($3::text IS NULL OR email ILIKE $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
            USER_COLUMNS
        ))
        .bind(any)
        .bind(name)
        .bind(email)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn delete_users(&self, ids: &[Uuid]) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM users WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Task::try_from).transpose()
    }

    async fn insert_task(&self, task: &Task) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, description, status, assignee_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.assignee_id)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_task(&self, task: &Task) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE tasks
            SET title = $2, description = $3, status = $4, assignee_id = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.assignee_id)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn scan_tasks(&self, page: Pagination) -> StoreResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {} FROM tasks ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            TASK_COLUMNS
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    async fn insert_comment(&self, comment: &Comment) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, task_id, author_id, body, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.id)
        .bind(comment.task_id)
        .bind(comment.author_id)
        .bind(&comment.body)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn comments_for_task(&self, task_id: Uuid) -> StoreResult<Vec<Comment>> {
        // seq breaks ties between comments created in the same instant
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, task_id, author_id, body, created_at
            FROM comments
            WHERE task_id = $1
            ORDER BY created_at ASC, seq ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        crate::db::pool::health_check(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("bob"), "%bob%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_pool_timeout_is_transient() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(err.is_transient());
    }

    #[test]
    fn test_user_row_rejects_unknown_role() {
        let row = UserRow {
            id: Uuid::new_v4(),
            email: "x@example.com".into(),
            name: "X".into(),
            role: "owner".into(),
            created_at: Utc::now(),
            deleted_at: None,
        };
        assert!(matches!(User::try_from(row), Err(StoreError::Corrupt(_))));
    }
}
