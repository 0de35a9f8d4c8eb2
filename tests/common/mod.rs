//! Shared helpers for VMAPP integration tests.

#![allow(dead_code)]

use tempfile::TempDir;
use vmapp::{Database, Domain, DomainRepository, NewDomain, NewUser, Password, User, UserRepository};

/// File-backed test database that lives as long as its directory.
pub struct TestDb {
    pub db: Database,
    pub dir: TempDir,
}

impl TestDb {
    /// Path of the database file.
    pub fn path(&self) -> std::path::PathBuf {
        self.dir.path().join("vmapp.db")
    }
}

/// Open a fresh database file in a temporary directory.
pub async fn setup_file_db() -> TestDb {
    let dir = TempDir::new().unwrap();
    let db = Database::open(dir.path().join("vmapp.db")).await.unwrap();
    TestDb { db, dir }
}

/// Create an enabled domain.
pub async fn create_domain(db: &Database, name: &str) -> Domain {
    DomainRepository::new(db.pool())
        .create(&NewDomain::new(name))
        .await
        .unwrap()
}

/// Create an enabled mailbox with the default quota.
pub async fn create_user(db: &Database, domain_id: i64, username: &str, password: &str) -> User {
    UserRepository::new(db.pool())
        .create(&NewUser::new(domain_id, username, Password::plaintext(password)))
        .await
        .unwrap()
}

/// Raw stored quota in bytes for a mailbox.
pub async fn stored_quota(db: &Database, user_id: i64) -> i64 {
    sqlx::query_scalar("SELECT quota FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(db.pool())
        .await
        .unwrap()
}

/// Raw stored password column for a mailbox.
pub async fn stored_password(db: &Database, user_id: i64) -> String {
    sqlx::query_scalar("SELECT password FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(db.pool())
        .await
        .unwrap()
}
