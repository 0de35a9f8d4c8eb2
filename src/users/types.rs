//! Mailbox user model for VMAPP.
//!
//! Quota is expressed in megabytes on every type in this module. The byte
//! value only exists in the `users` table; the repository converts at the
//! storage boundary.

use std::fmt;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::auth::Password;
use crate::validation::{password_rules, username_chars};

/// Bytes in one megabyte of quota.
pub const BYTES_PER_MEGABYTE: i64 = 1024 * 1024;

/// Quota given to new mailboxes when none is specified.
pub const DEFAULT_QUOTA_MB: i64 = 128;

/// Largest quota whose byte value still fits the storage column.
pub const MAX_QUOTA_MB: i64 = i64::MAX / BYTES_PER_MEGABYTE;

/// Convert a megabyte quota to the persisted byte value.
///
/// Returns None if the result would overflow.
pub fn quota_to_bytes(megabytes: i64) -> Option<i64> {
    megabytes.checked_mul(BYTES_PER_MEGABYTE)
}

/// Convert a persisted byte value to megabytes, dropping any remainder.
pub fn quota_from_bytes(bytes: i64) -> i64 {
    bytes / BYTES_PER_MEGABYTE
}

/// Mailbox user entity.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// ID of the owning domain.
    pub domain_id: i64,
    /// Hostname of the owning domain, as loaded.
    pub domain: String,
    /// Mailbox name (local part).
    #[validate(
        length(min = 1, max = 64, message = "Username must be 1 to 64 characters"),
        custom(function = "username_chars")
    )]
    pub username: String,
    /// Password, always [`Password::Hashed`] when loaded.
    #[validate(custom(function = "password_rules"))]
    pub password: Password,
    /// Quota in megabytes.
    #[validate(range(
        min = 0,
        max = MAX_QUOTA_MB,
        message = "Quota must be between 0 and 8796093022207 megabytes"
    ))]
    pub quota: i64,
    /// Whether the mailbox is enabled.
    pub is_enabled: bool,
    /// Creation timestamp.
    pub ctime: DateTime<Utc>,
    /// Last modification timestamp.
    pub mtime: DateTime<Utc>,
}

impl User {
    /// The mailbox address, `username@domain`.
    pub fn email(&self) -> String {
        format!("{}@{}", self.username, self.domain)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.username, self.domain)
    }
}

/// Data for creating a new mailbox.
#[derive(Debug, Clone, Validate)]
pub struct NewUser {
    /// ID of the owning domain.
    pub domain_id: i64,
    /// Mailbox name (local part).
    #[validate(
        length(min = 1, max = 64, message = "Username must be 1 to 64 characters"),
        custom(function = "username_chars")
    )]
    pub username: String,
    /// Initial password.
    #[validate(custom(function = "password_rules"))]
    pub password: Password,
    /// Quota in megabytes (defaults to 128).
    #[validate(range(
        min = 0,
        max = MAX_QUOTA_MB,
        message = "Quota must be between 0 and 8796093022207 megabytes"
    ))]
    pub quota: i64,
    /// Whether the mailbox is enabled (defaults to true).
    pub is_enabled: bool,
}

impl NewUser {
    /// Create a new mailbox with minimal required fields.
    pub fn new(domain_id: i64, username: impl Into<String>, password: Password) -> Self {
        Self {
            domain_id,
            username: username.into(),
            password,
            quota: DEFAULT_QUOTA_MB,
            is_enabled: true,
        }
    }

    /// Set the quota in megabytes.
    pub fn with_quota(mut self, quota: i64) -> Self {
        self.quota = quota;
        self
    }

    /// Set the enabled flag.
    pub fn with_enabled(mut self, is_enabled: bool) -> Self {
        self.is_enabled = is_enabled;
        self
    }
}

/// Data for updating an existing mailbox.
#[derive(Debug, Clone, Default, Validate)]
pub struct UserUpdate {
    /// Move the mailbox to another domain.
    pub domain_id: Option<i64>,
    /// New mailbox name.
    #[validate(
        length(min = 1, max = 64, message = "Username must be 1 to 64 characters"),
        custom(function = "username_chars")
    )]
    pub username: Option<String>,
    /// New password.
    #[validate(custom(function = "password_rules"))]
    pub password: Option<Password>,
    /// New quota in megabytes.
    #[validate(range(
        min = 0,
        max = MAX_QUOTA_MB,
        message = "Quota must be between 0 and 8796093022207 megabytes"
    ))]
    pub quota: Option<i64>,
    /// New enabled flag.
    pub is_enabled: Option<bool>,
}

impl UserUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new owning domain.
    pub fn domain_id(mut self, domain_id: i64) -> Self {
        self.domain_id = Some(domain_id);
        self
    }

    /// Set new username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set new password.
    pub fn password(mut self, password: Password) -> Self {
        self.password = Some(password);
        self
    }

    /// Set new quota in megabytes.
    pub fn quota(mut self, quota: i64) -> Self {
        self.quota = Some(quota);
        self
    }

    /// Set enabled flag.
    pub fn is_enabled(mut self, is_enabled: bool) -> Self {
        self.is_enabled = Some(is_enabled);
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.domain_id.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.quota.is_none()
            && self.is_enabled.is_none()
    }
}
