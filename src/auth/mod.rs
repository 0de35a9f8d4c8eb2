//! Authentication module for VMAPP.
//!
//! Mailbox credentials only: the [`Password`] value carried by users and the
//! `{SHA512-CRYPT}` hashing and verification behind it.

mod password;

pub use password::{
    hash_password, validate_password, verify_password, Password, PasswordError, HASH_MARKER,
    HASH_SCHEME, MAX_PASSWORD_LENGTH, MAX_STORED_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
