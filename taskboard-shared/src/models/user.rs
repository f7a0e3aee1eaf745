/// User model
///
/// Users are soft-deleted: `deleted_at` marks a record as logically removed
/// while the row stays in storage. Email addresses are unique among active
/// users only, so a deleted user's email can be claimed again.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY,
///     email TEXT NOT NULL,
///     name TEXT NOT NULL,
///     role TEXT NOT NULL CHECK (role IN ('admin', 'member')),
///     created_at TIMESTAMPTZ NOT NULL,
///     deleted_at TIMESTAMPTZ
/// );
///
/// CREATE UNIQUE INDEX users_active_email_idx ON users (email) WHERE deleted_at IS NULL;
/// ```
///
/// # Example
///
/// ```
/// use taskboard_shared::models::user::{User, UserRole, UserRecord};
/// use chrono::Utc;
///
/// let user = User::new("bob@example.com", "Bob Builder", UserRole::Member, Utc::now());
/// assert!(user.is_active());
///
/// match UserRecord::from(user) {
///     UserRecord::Active(u) => assert_eq!(u.name, "Bob Builder"),
///     UserRecord::Deleted(_) => unreachable!(),
/// }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role a user holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Administrator
    Admin,

    /// Regular member
    Member,
}

impl UserRole {
    /// Converts role to string for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Member => "member",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "member" => Ok(UserRole::Member),
            other => Err(format!("unknown user role '{}'", other)),
        }
    }
}

/// User account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, unique among active users
    pub email: String,

    /// Display name
    pub name: String,

    /// Role
    pub role: UserRole,

    /// When the user was created
    pub created_at: DateTime<Utc>,

    /// When the user was soft-deleted (None while active)
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Builds a fresh active user with a generated ID
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        role: UserRole,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
            role,
            created_at: now,
            deleted_at: None,
        }
    }

    /// Whether the user has not been soft-deleted
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Display name
    pub name: String,

    /// Role
    pub role: UserRole,
}

/// A user lookup result tagged with its soft-delete state
///
/// Callers that only care about active users match on `Active`; callers that
/// need the record regardless call [`UserRecord::into_inner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRecord {
    /// User is active
    Active(User),

    /// User has been soft-deleted
    Deleted(User),
}

impl UserRecord {
    /// Borrows the underlying user
    pub fn user(&self) -> &User {
        match self {
            UserRecord::Active(user) | UserRecord::Deleted(user) => user,
        }
    }

    /// Unwraps the underlying user
    pub fn into_inner(self) -> User {
        match self {
            UserRecord::Active(user) | UserRecord::Deleted(user) => user,
        }
    }

    /// Whether the record is active
    pub fn is_active(&self) -> bool {
        matches!(self, UserRecord::Active(_))
    }

    /// Status label used in API responses
    pub fn status(&self) -> &'static str {
        match self {
            UserRecord::Active(_) => "active",
            UserRecord::Deleted(_) => "deleted",
        }
    }
}

impl From<User> for UserRecord {
    fn from(user: User) -> Self {
        if user.is_active() {
            UserRecord::Active(user)
        } else {
            UserRecord::Deleted(user)
        }
    }
}

/// Search criteria for users
///
/// Matching is case-insensitive substring matching.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UserSearch {
    /// No filter; same set as a plain listing
    #[default]
    All,

    /// Free-text query matched against name OR email
    Query(String),

    /// Structured filter; every present field must match
    Fields {
        /// Substring of the name
        name: Option<String>,

        /// Substring of the email
        email: Option<String>,
    },
}

impl UserSearch {
    /// Whether the criteria can never match anything
    ///
    /// A blank or whitespace-only free-text query yields no results.
    pub fn is_blank_query(&self) -> bool {
        matches!(self, UserSearch::Query(q) if q.trim().is_empty())
    }

    /// Tests a user against the criteria
    pub fn matches(&self, user: &User) -> bool {
        match self {
            UserSearch::All => true,
            UserSearch::Query(query) => {
                let needle = query.trim().to_lowercase();
                if needle.is_empty() {
                    return false;
                }
                user.name.to_lowercase().contains(&needle)
                    || user.email.to_lowercase().contains(&needle)
            }
            UserSearch::Fields { name, email } => {
                let name_ok = name
                    .as_ref()
                    .map_or(true, |n| user.name.to_lowercase().contains(&n.to_lowercase()));
                let email_ok = email
                    .as_ref()
                    .map_or(true, |e| user.email.to_lowercase().contains(&e.to_lowercase()));
                name_ok && email_ok
            }
        }
    }
}
