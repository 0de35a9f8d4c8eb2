//! Mailbox user repository for VMAPP.
//!
//! Every write goes through the same two steps before touching the table:
//! the password is resolved to its stored form (hashing only
//! [`Password::Plaintext`]) and the megabyte quota is converted to bytes.
//! Every read converts the byte quota back in `UserRow::into_user`.

use chrono::{DateTime, Utc};
use sqlx::QueryBuilder;
use tracing::debug;
use validator::{Validate, ValidationError, ValidationErrors};

use super::types::{quota_from_bytes, quota_to_bytes, NewUser, User, UserUpdate};
use crate::auth::Password;
use crate::db::{DbPool, Timestamps};
use crate::{Result, VmappError};

const SELECT_USER: &str = "SELECT u.id, u.domain_id, d.domain, u.username, u.password, u.quota,
        u.is_enabled, u.ctime, u.mtime
     FROM users u JOIN domains d ON d.id = u.domain_id";

/// Repository for mailbox user CRUD operations.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new mailbox in the database.
    ///
    /// A plaintext password is hashed with a fresh salt. Fails with a
    /// constraint violation if (username, domain) already exists or the
    /// domain does not.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        new_user.validate()?;

        let password = new_user.password.to_stored()?;
        let quota = quota_bytes(new_user.quota)?;
        let ts = Timestamps::on_insert();

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (domain_id, username, password, quota, is_enabled, ctime, mtime)
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(new_user.domain_id)
        .bind(&new_user.username)
        .bind(&password)
        .bind(quota)
        .bind(new_user.is_enabled)
        .bind(ts.ctime)
        .bind(ts.mtime)
        .fetch_one(self.pool)
        .await?;

        debug!(id, username = %new_user.username, domain_id = new_user.domain_id, "created user");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| VmappError::NotFound("user".to_string()))
    }

    /// Get a mailbox by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE u.id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(UserRow::into_user))
    }

    /// Get a mailbox by username and domain hostname.
    pub async fn get_by_address(&self, username: &str, domain: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "{SELECT_USER} WHERE u.username = ? AND d.domain = ?"
        ))
        .bind(username)
        .bind(domain)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    /// Get a mailbox by its `username@domain` address.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        match email.rsplit_once('@') {
            Some((username, domain)) => self.get_by_address(username, domain).await,
            None => Ok(None),
        }
    }

    /// Write every field of a mailbox back to the database.
    ///
    /// A record loaded from the database carries a hashed password, which is
    /// stored unchanged; assigning [`Password::Plaintext`] before saving
    /// replaces it with a new hash. Returns the reloaded record.
    pub async fn save(&self, user: &User) -> Result<User> {
        user.validate()?;

        let password = user.password.to_stored()?;
        let quota = quota_bytes(user.quota)?;

        let result = sqlx::query(
            "UPDATE users
             SET domain_id = ?, username = ?, password = ?, quota = ?, is_enabled = ?, mtime = ?
             WHERE id = ?",
        )
        .bind(user.domain_id)
        .bind(&user.username)
        .bind(&password)
        .bind(quota)
        .bind(user.is_enabled)
        .bind(Timestamps::on_update())
        .bind(user.id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(VmappError::NotFound("user".to_string()));
        }

        debug!(id = user.id, rehashed = !user.password.is_hashed(), "saved user");

        self.get_by_id(user.id)
            .await?
            .ok_or_else(|| VmappError::NotFound("user".to_string()))
    }

    /// Update a mailbox by ID.
    ///
    /// Only fields that are set in the update will be modified.
    /// Returns the updated mailbox, or None if not found.
    pub async fn update(&self, id: i64, update: &UserUpdate) -> Result<Option<User>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }
        update.validate()?;

        let password = update.password.as_ref().map(Password::to_stored).transpose()?;
        let quota = update.quota.map(quota_bytes).transpose()?;

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE users SET ");
        let mut separated = query.separated(", ");

        if let Some(domain_id) = update.domain_id {
            separated.push("domain_id = ");
            separated.push_bind_unseparated(domain_id);
        }
        if let Some(ref username) = update.username {
            separated.push("username = ");
            separated.push_bind_unseparated(username);
        }
        if let Some(ref password) = password {
            separated.push("password = ");
            separated.push_bind_unseparated(password);
        }
        if let Some(quota) = quota {
            separated.push("quota = ");
            separated.push_bind_unseparated(quota);
        }
        if let Some(is_enabled) = update.is_enabled {
            separated.push("is_enabled = ");
            separated.push_bind_unseparated(is_enabled);
        }
        separated.push("mtime = ");
        separated.push_bind_unseparated(Timestamps::on_update());

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(self.pool).await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        debug!(id, "updated user");
        self.get_by_id(id).await
    }

    /// Delete a mailbox by ID.
    ///
    /// Returns true if a mailbox was deleted, false if not found.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            debug!(id, "deleted user");
        }
        Ok(deleted)
    }

    /// List the mailboxes of one domain ordered by username.
    pub async fn list_by_domain(&self, domain_id: i64) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "{SELECT_USER} WHERE u.domain_id = ? ORDER BY u.username"
        ))
        .bind(domain_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }

    /// List all mailboxes ordered by domain, then username.
    pub async fn list_all(&self) -> Result<Vec<User>> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("{SELECT_USER} ORDER BY d.domain, u.username"))
                .fetch_all(self.pool)
                .await?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }
}

/// Convert a validated megabyte quota to bytes for storage.
fn quota_bytes(megabytes: i64) -> Result<i64> {
    match quota_to_bytes(megabytes) {
        Some(bytes) if bytes >= 0 => Ok(bytes),
        _ => {
            let mut errors = ValidationErrors::new();
            errors.add("quota", ValidationError::new("range"));
            Err(VmappError::Validation(errors))
        }
    }
}

/// Internal struct for mapping database rows to User.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    domain_id: i64,
    domain: String,
    username: String,
    password: String,
    /// Bytes.
    quota: i64,
    is_enabled: bool,
    ctime: DateTime<Utc>,
    mtime: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            domain_id: self.domain_id,
            domain: self.domain,
            username: self.username,
            password: Password::Hashed(self.password),
            quota: quota_from_bytes(self.quota),
            is_enabled: self.is_enabled,
            ctime: self.ctime,
            mtime: self.mtime,
        }
    }
}
