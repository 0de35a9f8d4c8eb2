//! Administration module for VMAPP.
//!
//! This module provides the read-side views an admin console needs:
//! - Domain summaries with total and enabled mailbox counts
//! - A flat mailbox listing with derived address and quota in megabytes
//! - Parsing of raw mailbox form input ([`UserForm`])

mod form;

pub use form::UserForm;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::db::Database;
use crate::users::{quota_from_bytes, User, UserRepository, DEFAULT_QUOTA_MB};
use crate::Result;

/// Domain row for the admin overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSummary {
    /// Domain ID.
    pub id: i64,
    /// Hostname.
    pub domain: String,
    /// Whether the domain is enabled.
    pub is_enabled: bool,
    /// Number of mailboxes in the domain.
    pub total_users: i64,
    /// Number of enabled mailboxes in the domain.
    pub enabled_users: i64,
    /// Creation timestamp.
    pub ctime: DateTime<Utc>,
    /// Last modification timestamp.
    pub mtime: DateTime<Utc>,
}

/// Mailbox row for the admin listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListing {
    /// User ID.
    pub id: i64,
    /// Mailbox address, `username@domain`.
    pub email: String,
    /// Mailbox name.
    pub username: String,
    /// Hostname of the owning domain.
    pub domain: String,
    /// Whether the mailbox is enabled.
    pub is_enabled: bool,
    /// Quota in megabytes.
    pub quota: i64,
    /// Creation timestamp.
    pub ctime: DateTime<Utc>,
    /// Last modification timestamp.
    pub mtime: DateTime<Utc>,
    /// Whether the owning domain is enabled.
    pub is_domain_enabled: bool,
}

/// Admin service for the mail console views.
pub struct AdminService<'a> {
    db: &'a Database,
    default_quota_mb: i64,
}

impl<'a> AdminService<'a> {
    /// Create a new AdminService using the built-in default quota.
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            default_quota_mb: DEFAULT_QUOTA_MB,
        }
    }

    /// Set the quota applied when a form leaves it blank
    /// (`users.default_quota_mb` in the configuration).
    pub fn with_default_quota(mut self, default_quota_mb: i64) -> Self {
        self.default_quota_mb = default_quota_mb;
        self
    }

    /// Get database reference.
    pub fn db(&self) -> &Database {
        self.db
    }

    /// Quota in megabytes applied to blank form input.
    pub fn default_quota_mb(&self) -> i64 {
        self.default_quota_mb
    }

    /// Every domain with its mailbox counts, ordered by hostname.
    ///
    /// Domains without mailboxes report zero for both counts.
    pub async fn domain_summaries(&self) -> Result<Vec<DomainSummary>> {
        let rows: Vec<DomainSummaryRow> = sqlx::query_as(
            "SELECT d.id, d.domain, d.is_enabled,
                    COUNT(u.id) AS total_users,
                    COALESCE(SUM(CASE WHEN u.is_enabled THEN 1 ELSE 0 END), 0) AS enabled_users,
                    d.ctime, d.mtime
             FROM domains d
             LEFT JOIN users u ON u.domain_id = d.id
             GROUP BY d.id
             ORDER BY d.domain",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(DomainSummaryRow::into_summary).collect())
    }

    /// Every mailbox, ordered by hostname then username.
    pub async fn user_listing(&self) -> Result<Vec<UserListing>> {
        let rows: Vec<UserListingRow> = sqlx::query_as(
            "SELECT u.id, u.username, d.domain, u.is_enabled, u.quota,
                    u.ctime, u.mtime, d.is_enabled AS is_domain_enabled
             FROM users u
             JOIN domains d ON d.id = u.domain_id
             ORDER BY d.domain, u.username",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(UserListingRow::into_listing).collect())
    }

    /// Create a mailbox from raw form input.
    ///
    /// Every invalid field is reported in one validation error. A blank
    /// quota falls back to the service's default quota.
    pub async fn create_user(&self, form: &UserForm) -> Result<User> {
        let new_user = form.to_new_user(self.default_quota_mb)?;
        let user = UserRepository::new(self.db.pool()).create(&new_user).await?;
        info!(id = user.id, email = %user, "admin created mailbox");
        Ok(user)
    }
}

#[derive(sqlx::FromRow)]
struct DomainSummaryRow {
    id: i64,
    domain: String,
    is_enabled: bool,
    total_users: i64,
    enabled_users: i64,
    ctime: DateTime<Utc>,
    mtime: DateTime<Utc>,
}

impl DomainSummaryRow {
    fn into_summary(self) -> DomainSummary {
        DomainSummary {
            id: self.id,
            domain: self.domain,
            is_enabled: self.is_enabled,
            total_users: self.total_users,
            enabled_users: self.enabled_users,
            ctime: self.ctime,
            mtime: self.mtime,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserListingRow {
    id: i64,
    username: String,
    domain: String,
    is_enabled: bool,
    /// Bytes.
    quota: i64,
    ctime: DateTime<Utc>,
    mtime: DateTime<Utc>,
    is_domain_enabled: bool,
}

impl UserListingRow {
    fn into_listing(self) -> UserListing {
        UserListing {
            id: self.id,
            email: format!("{}@{}", self.username, self.domain),
            username: self.username,
            domain: self.domain,
            is_enabled: self.is_enabled,
            quota: quota_from_bytes(self.quota),
            ctime: self.ctime,
            mtime: self.mtime,
            is_domain_enabled: self.is_domain_enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Password;
    use crate::domains::{DomainRepository, DomainUpdate, NewDomain};
    use crate::users::NewUser;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    async fn add_domain(db: &Database, name: &str) -> i64 {
        DomainRepository::new(db.pool())
            .create(&NewDomain::new(name))
            .await
            .unwrap()
            .id
    }

    async fn add_user(db: &Database, domain_id: i64, username: &str, enabled: bool) {
        let new_user = NewUser::new(domain_id, username, Password::plaintext("password123"))
            .with_enabled(enabled);
        UserRepository::new(db.pool())
            .create(&new_user)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_domain_summaries_counts() {
        let db = setup_db().await;
        let busy = add_domain(&db, "busy.example").await;
        add_domain(&db, "empty.example").await;

        add_user(&db, busy, "alice", true).await;
        add_user(&db, busy, "bob", true).await;
        add_user(&db, busy, "carol", false).await;

        let admin = AdminService::new(&db);
        let summaries = admin.domain_summaries().await.unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].domain, "busy.example");
        assert_eq!(summaries[0].total_users, 3);
        assert_eq!(summaries[0].enabled_users, 2);
        assert_eq!(summaries[1].domain, "empty.example");
        assert_eq!(summaries[1].total_users, 0);
        assert_eq!(summaries[1].enabled_users, 0);
    }

    #[tokio::test]
    async fn test_domain_summaries_empty() {
        let db = setup_db().await;
        let admin = AdminService::new(&db);
        assert!(admin.domain_summaries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_listing() {
        let db = setup_db().await;
        let domain_id = add_domain(&db, "example.com").await;
        add_user(&db, domain_id, "zed", true).await;
        add_user(&db, domain_id, "amy", false).await;

        DomainRepository::new(db.pool())
            .update(domain_id, &DomainUpdate::new().is_enabled(false))
            .await
            .unwrap();

        let admin = AdminService::new(&db);
        let listing = admin.user_listing().await.unwrap();

        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].email, "amy@example.com");
        assert!(!listing[0].is_enabled);
        assert_eq!(listing[1].email, "zed@example.com");
        assert!(listing[1].is_enabled);
        assert!(listing.iter().all(|row| !row.is_domain_enabled));
        assert!(listing.iter().all(|row| row.quota == DEFAULT_QUOTA_MB));
    }

    #[tokio::test]
    async fn test_create_user_from_form() {
        let db = setup_db().await;
        let domain_id = add_domain(&db, "example.com").await;

        let form = UserForm {
            domain: domain_id.to_string(),
            username: "john".to_string(),
            password: "password123".to_string(),
            quota: "250".to_string(),
            is_enabled: true,
        };

        let admin = AdminService::new(&db);
        let user = admin.create_user(&form).await.unwrap();

        assert_eq!(user.email(), "john@example.com");
        assert_eq!(user.quota, 250);
        assert!(user.password.is_hashed());
        assert!(user.password.verify("password123").is_ok());
    }

    #[tokio::test]
    async fn test_create_user_blank_quota_uses_configured_default() {
        let db = setup_db().await;
        let domain_id = add_domain(&db, "example.com").await;

        let form = UserForm {
            domain: domain_id.to_string(),
            username: "john".to_string(),
            password: "password123".to_string(),
            quota: String::new(),
            is_enabled: true,
        };

        let admin = AdminService::new(&db);
        assert_eq!(admin.default_quota_mb(), DEFAULT_QUOTA_MB);

        let admin = admin.with_default_quota(512);
        let user = admin.create_user(&form).await.unwrap();
        assert_eq!(user.quota, 512);
    }

    #[tokio::test]
    async fn test_create_user_from_invalid_form() {
        let db = setup_db().await;

        let form = UserForm {
            domain: "first".to_string(),
            username: String::new(),
            password: "short".to_string(),
            quota: "abcd".to_string(),
            is_enabled: true,
        };

        let admin = AdminService::new(&db);
        let err = admin
            .create_user(&form)
            .await
            .unwrap_err();

        assert_eq!(
            err.invalid_fields(),
            vec!["domain", "password", "quota", "username"]
        );
        assert!(admin.user_listing().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_user_unknown_domain() {
        let db = setup_db().await;

        let form = UserForm {
            domain: "42".to_string(),
            username: "john".to_string(),
            password: "password123".to_string(),
            quota: String::new(),
            is_enabled: true,
        };

        let admin = AdminService::new(&db);
        let err = admin
            .create_user(&form)
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation(), "got {err:?}");
    }
}
