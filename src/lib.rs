//! VMAPP - virtual mail hosting data model
//!
//! Domains, mailboxes and aliases for a virtual mail host, persisted in
//! SQLite. Mailbox passwords are stored as `{SHA512-CRYPT}` hashes and quota
//! is handled in megabytes while stored in bytes.

pub mod admin;
pub mod aliases;
pub mod auth;
pub mod config;
pub mod db;
pub mod domains;
pub mod error;
pub mod logging;
pub mod users;
pub mod validation;

pub use admin::{AdminService, DomainSummary, UserForm, UserListing};
pub use aliases::{Alias, AliasRepository, AliasUpdate, NewAlias};
pub use auth::{hash_password, validate_password, verify_password, Password, PasswordError};
pub use config::Config;
pub use db::{Database, DbPool};
pub use domains::{Domain, DomainRepository, DomainUpdate, NewDomain};
pub use error::{Result, VmappError};
pub use users::{NewUser, User, UserRepository, UserUpdate};
