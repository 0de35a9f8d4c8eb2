//! Mailbox users for VMAPP.
//!
//! A user is a mailbox scoped to one domain and identified by
//! (username, domain). Quota is megabytes in memory and bytes on disk;
//! passwords are stored as `{SHA512-CRYPT}` hashes.

mod repository;
mod types;

pub use repository::UserRepository;
pub use types::{
    quota_from_bytes, quota_to_bytes, NewUser, User, UserUpdate, BYTES_PER_MEGABYTE,
    DEFAULT_QUOTA_MB, MAX_QUOTA_MB,
};
