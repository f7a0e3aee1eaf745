/// User service
///
/// Owns signup, lookup, listing, search and deletion of users.
///
/// # Invariants
///
/// - No two active users share an email.
/// - Under [`DeletionPolicy::Soft`] users are never physically removed;
///   `deleted_at` marks them and restore clears it.
///
/// # Example
///
/// ```
/// use taskboard_shared::clock::SystemClock;
/// use taskboard_shared::models::user::{CreateUser, UserRole, UserRecord};
/// use taskboard_shared::services::{DeletionPolicy, UserService};
/// use taskboard_shared::store::memory::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), taskboard_shared::services::ServiceError> {
/// let users = UserService::new(
///     Arc::new(MemoryStore::new()),
///     Arc::new(SystemClock),
///     DeletionPolicy::Soft,
/// );
///
/// let bob = users
///     .create_user(CreateUser {
///         email: "bob@example.com".into(),
///         name: "Bob".into(),
///         role: UserRole::Member,
///     })
///     .await?;
///
/// assert!(users.delete_user(bob.id).await?);
/// assert!(matches!(users.get_user_by_id(bob.id).await?, Some(UserRecord::Deleted(_))));
/// # Ok(())
/// # }
/// ```

use std::collections::HashSet;
use std::str::FromStr;
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::clock::SharedClock;
use crate::models::{
    user::{CreateUser, User, UserRecord, UserSearch},
    Pagination,
};
use crate::store::SharedStore;

/// How user deletion behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletionPolicy {
    /// Mark users deleted and allow restore
    #[default]
    Soft,

    /// Physically remove rows; restore is unavailable
    Hard,
}

impl FromStr for DeletionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "soft" => Ok(DeletionPolicy::Soft),
            "hard" => Ok(DeletionPolicy::Hard),
            other => Err(format!("unknown deletion policy '{}'", other)),
        }
    }
}

/// Business rules for users
pub struct UserService {
    store: SharedStore,
    clock: SharedClock,
    deletion: DeletionPolicy,
}

impl UserService {
    /// Creates the service
    pub fn new(store: SharedStore, clock: SharedClock, deletion: DeletionPolicy) -> Self {
        Self {
            store,
            clock,
            deletion,
        }
    }

    /// Active deletion policy
    pub fn deletion_policy(&self) -> DeletionPolicy {
        self.deletion
    }

    /// Registers a new user
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Conflict`] if an active user already holds the email
    /// - [`ServiceError::Storage`] if storage fails
    pub async fn create_user(&self, data: CreateUser) -> ServiceResult<User> {
        if self.store.find_active_user_by_email(&data.email).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "User with email '{}' already exists",
                data.email
            )));
        }

        let user = User::new(data.email, data.name, data.role, self.clock.now());
        self.store.insert_user(&user).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// Looks a user up regardless of soft-delete state
    pub async fn get_user_by_id(&self, id: Uuid) -> ServiceResult<Option<UserRecord>> {
        Ok(self.store.find_user(id).await?.map(UserRecord::from))
    }

    /// Lists active users, newest first
    pub async fn list_users(&self, page: Pagination) -> ServiceResult<Vec<User>> {
        Ok(self.store.scan_users(&UserSearch::All, page).await?)
    }

    /// Searches active users
    ///
    /// A blank free-text query returns an empty list without touching storage.
    pub async fn search_users(
        &self,
        criteria: &UserSearch,
        page: Pagination,
    ) -> ServiceResult<Vec<User>> {
        if criteria.is_blank_query() {
            return Ok(Vec::new());
        }

        Ok(self.store.scan_users(criteria, page).await?)
    }

    /// Deletes a user
    ///
    /// Returns `false` if the user does not exist or is already deleted.
    pub async fn delete_user(&self, id: Uuid) -> ServiceResult<bool> {
        match self.deletion {
            DeletionPolicy::Soft => {
                let Some(mut user) = self.store.find_user(id).await? else {
                    return Ok(false);
                };
                if !user.is_active() {
                    return Ok(false);
                }

                user.deleted_at = Some(self.clock.now());
                self.store.update_user(&user).await?;

                tracing::info!(user_id = %id, "User soft-deleted");
                Ok(true)
            }
            DeletionPolicy::Hard => {
                let removed = self.store.delete_users(&[id]).await?;
                if removed > 0 {
                    tracing::info!(user_id = %id, "User removed");
                }
                Ok(removed > 0)
            }
        }
    }

    /// Restores a soft-deleted user
    ///
    /// Returns `None` if the user does not exist, is not deleted, or the
    /// deletion policy is [`DeletionPolicy::Hard`].
    ///
    /// # Errors
    ///
    /// [`ServiceError::Conflict`] if another active user has claimed the
    /// email in the meantime.
    pub async fn restore_user(&self, id: Uuid) -> ServiceResult<Option<User>> {
        if self.deletion == DeletionPolicy::Hard {
            return Ok(None);
        }

        let Some(mut user) = self.store.find_user(id).await? else {
            return Ok(None);
        };
        if user.is_active() {
            return Ok(None);
        }

        if let Some(holder) = self.store.find_active_user_by_email(&user.email).await? {
            return Err(ServiceError::Conflict(format!(
                "Email '{}' is now held by user {}",
                user.email, holder.id
            )));
        }

        user.deleted_at = None;
        self.store.update_user(&user).await?;

        tracing::info!(user_id = %id, "User restored");
        Ok(Some(user))
    }

    /// Deletes many users at once, returning how many were actually deleted
    ///
    /// Unknown or already-deleted IDs are skipped. An empty list returns 0
    /// without touching storage.
    pub async fn bulk_delete_users(&self, ids: &[Uuid]) -> ServiceResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut seen = HashSet::new();
        let unique: Vec<Uuid> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let deleted = match self.deletion {
            DeletionPolicy::Hard => self.store.delete_users(&unique).await?,
            DeletionPolicy::Soft => {
                let mut count = 0;
                for id in unique {
                    if self.delete_user(id).await? {
                        count += 1;
                    }
                }
                count
            }
        };

        tracing::info!(requested = ids.len(), deleted, "Bulk user delete");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deletion_policy_from_str() {
        assert_eq!("soft".parse::<DeletionPolicy>().unwrap(), DeletionPolicy::Soft);
        assert_eq!("HARD".parse::<DeletionPolicy>().unwrap(), DeletionPolicy::Hard);
        assert!("archive".parse::<DeletionPolicy>().is_err());
        assert_eq!(DeletionPolicy::default(), DeletionPolicy::Soft);
    }
}
