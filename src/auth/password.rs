//! Password hashing and validation for VMAPP.
//!
//! Mailbox passwords are stored in the Dovecot-style `{SHA512-CRYPT}` format:
//! the scheme tag followed by a salted SHA-512 crypt string (`$6$salt$hash`).

use std::fmt;

use serde::{Serialize, Serializer};
use sha_crypt::{sha512_check, sha512_simple, Sha512Params};
use thiserror::Error;

/// Minimum plaintext password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum plaintext password length, in characters.
pub const MAX_PASSWORD_LENGTH: usize = 256;

/// Maximum length of the stored (hashed) password column.
pub const MAX_STORED_PASSWORD_LENGTH: usize = 256;

/// Scheme tag prepended to every stored hash.
pub const HASH_SCHEME: &str = "{SHA512-CRYPT}";

/// Prefix that marks a value as already hashed.
pub const HASH_MARKER: &str = "{SHA512-CRYPT}$6$";

/// Password-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// Password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,

    /// Password is too long.
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    TooLong,

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    HashError(String),

    /// Stored value is not a `{SHA512-CRYPT}` hash.
    #[error("invalid password hash format")]
    InvalidHash,

    /// Password verification failed (wrong password).
    #[error("password verification failed")]
    VerificationFailed,
}

/// A mailbox password, either as typed by an administrator or as stored.
///
/// Records read back from the database always carry [`Password::Hashed`].
/// The write path hashes [`Password::Plaintext`] and stores
/// [`Password::Hashed`] verbatim, so a re-save never re-hashes.
#[derive(Clone, PartialEq, Eq)]
pub enum Password {
    /// A new password that has not been hashed yet.
    Plaintext(String),
    /// A `{SHA512-CRYPT}` hash string.
    Hashed(String),
}

impl Password {
    /// Wrap a new plaintext password.
    pub fn plaintext(password: impl Into<String>) -> Self {
        Password::Plaintext(password.into())
    }

    /// Wrap a stored hash.
    pub fn hashed(hash: impl Into<String>) -> Self {
        Password::Hashed(hash.into())
    }

    /// Classify untyped input by the hash marker prefix.
    ///
    /// A value starting with `{SHA512-CRYPT}$6$` is taken as an existing hash,
    /// anything else as plaintext. A plaintext that happens to start with the
    /// marker is therefore stored unhashed; use [`Password::plaintext`] when
    /// the caller knows the value is new.
    pub fn from_input(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.starts_with(HASH_MARKER) {
            Password::Hashed(value)
        } else {
            Password::Plaintext(value)
        }
    }

    /// Returns true if this value is already hashed.
    pub fn is_hashed(&self) -> bool {
        matches!(self, Password::Hashed(_))
    }

    /// The stored hash, if this value is hashed.
    pub fn as_hash(&self) -> Option<&str> {
        match self {
            Password::Hashed(hash) => Some(hash),
            Password::Plaintext(_) => None,
        }
    }

    /// Check length rules.
    ///
    /// Plaintext is checked against the 8..=256 character bounds before it
    /// is hashed. A hash only has to look like one and fit the column.
    pub fn validate(&self) -> Result<(), PasswordError> {
        match self {
            Password::Plaintext(plain) => validate_password(plain),
            Password::Hashed(hash) => {
                if !hash.starts_with(HASH_MARKER) || hash.len() > MAX_STORED_PASSWORD_LENGTH {
                    return Err(PasswordError::InvalidHash);
                }
                Ok(())
            }
        }
    }

    /// Produce the string to persist, hashing plaintext with a fresh salt.
    pub fn to_stored(&self) -> Result<String, PasswordError> {
        match self {
            Password::Plaintext(plain) => hash_password(plain),
            Password::Hashed(hash) => Ok(hash.clone()),
        }
    }

    /// Verify a candidate plaintext against this password.
    pub fn verify(&self, candidate: &str) -> Result<(), PasswordError> {
        match self {
            Password::Hashed(hash) => verify_password(candidate, hash),
            Password::Plaintext(plain) => {
                if plain == candidate {
                    Ok(())
                } else {
                    Err(PasswordError::VerificationFailed)
                }
            }
        }
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Password::Plaintext(_) => f.write_str("Plaintext(<redacted>)"),
            Password::Hashed(hash) => f.debug_tuple("Hashed").field(hash).finish(),
        }
    }
}

// Validation errors carry the field value; plaintext must not end up there.
impl Serialize for Password {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Password::Plaintext(_) => serializer.serialize_str("<redacted>"),
            Password::Hashed(hash) => serializer.serialize_str(hash),
        }
    }
}

/// Hash a password with SHA-512 crypt and a random salt.
///
/// Returns the `{SHA512-CRYPT}$6$...` string stored in the `users` table.
///
/// # Examples
///
/// ```
/// use vmapp::hash_password;
///
/// let hash = hash_password("my_secure_password").unwrap();
/// assert!(hash.starts_with("{SHA512-CRYPT}$6$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    validate_password(password)?;

    let params = Sha512Params::default();
    let crypted = sha512_simple(password, &params)
        .map_err(|e| PasswordError::HashError(format!("{e:?}")))?;

    Ok(format!("{HASH_SCHEME}{crypted}"))
}

/// Verify a plaintext password against a stored `{SHA512-CRYPT}` hash.
///
/// # Examples
///
/// ```
/// use vmapp::{hash_password, verify_password};
///
/// let hash = hash_password("my_secure_password").unwrap();
/// assert!(verify_password("my_secure_password", &hash).is_ok());
/// assert!(verify_password("wrong_password", &hash).is_err());
/// ```
pub fn verify_password(password: &str, stored: &str) -> Result<(), PasswordError> {
    let crypted = stored
        .strip_prefix(HASH_SCHEME)
        .filter(|rest| rest.starts_with("$6$"))
        .ok_or(PasswordError::InvalidHash)?;

    sha512_check(password, crypted).map_err(|_| PasswordError::VerificationFailed)
}

/// Validate plaintext password length.
///
/// Checks:
/// - Minimum length: 8 characters
/// - Maximum length: 256 characters
///
/// # Examples
///
/// ```
/// use vmapp::validate_password;
///
/// assert!(validate_password("short").is_err());
/// assert!(validate_password("valid_password_123").is_ok());
/// ```
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(PasswordError::TooLong);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_format() {
        let password = "test_password_123";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with(HASH_MARKER));
        assert!(!hash.contains(password));
        assert!(hash.len() <= MAX_STORED_PASSWORD_LENGTH);
    }

    #[test]
    fn test_hash_password_different_hashes() {
        let password = "same_password";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();

        // Same password should produce different hashes (different salts)
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct() {
        let password = "correct_password";
        let hash = hash_password(password).unwrap();

        assert!(verify_password(password, &hash).is_ok());
    }

    #[test]
    fn test_verify_password_wrong() {
        let hash = hash_password("correct_password").unwrap();

        let result = verify_password("wrong_password", &hash);
        assert!(matches!(result, Err(PasswordError::VerificationFailed)));
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        let result = verify_password("any_password", "not_a_valid_hash");
        assert!(matches!(result, Err(PasswordError::InvalidHash)));

        // Scheme tag without a SHA-512 crypt payload
        let result = verify_password("any_password", "{SHA512-CRYPT}$1$abc$def");
        assert!(matches!(result, Err(PasswordError::InvalidHash)));
    }

    #[test]
    fn test_validate_password_bounds() {
        assert_eq!(validate_password(&"a".repeat(7)), Err(PasswordError::TooShort));
        assert!(validate_password(&"a".repeat(8)).is_ok());
        assert!(validate_password(&"a".repeat(256)).is_ok());
        assert_eq!(validate_password(&"a".repeat(257)), Err(PasswordError::TooLong));
    }

    #[test]
    fn test_validate_password_counts_characters() {
        // 8 characters, 24 bytes
        assert!(validate_password("パスワードです!").is_ok());
        // 256 characters, far more than 256 bytes
        assert!(validate_password(&"é".repeat(256)).is_ok());
    }

    #[test]
    fn test_hash_password_rejects_invalid_length() {
        assert!(matches!(hash_password("short"), Err(PasswordError::TooShort)));
        assert!(matches!(
            hash_password(&"a".repeat(257)),
            Err(PasswordError::TooLong)
        ));
    }

    #[test]
    fn test_from_input_sniffs_marker() {
        let hash = hash_password("sniffed_password").unwrap();
        assert!(Password::from_input(hash.clone()).is_hashed());
        assert!(!Password::from_input("sniffed_password").is_hashed());
        // Scheme tag alone is not enough
        assert!(!Password::from_input("{SHA512-CRYPT}plain").is_hashed());
    }

    #[test]
    fn test_to_stored_keeps_hash() {
        let hash = hash_password("kept_password").unwrap();
        let password = Password::hashed(hash.clone());
        assert_eq!(password.to_stored().unwrap(), hash);
    }

    #[test]
    fn test_to_stored_hashes_plaintext() {
        let password = Password::plaintext("fresh_password");
        let stored = password.to_stored().unwrap();
        assert!(stored.starts_with(HASH_MARKER));
        assert!(Password::hashed(stored).verify("fresh_password").is_ok());
    }

    #[test]
    fn test_validate_hashed_value() {
        let hash = hash_password("valid_password").unwrap();
        assert!(Password::hashed(hash).validate().is_ok());
        assert_eq!(
            Password::hashed("$6$bare$crypt").validate(),
            Err(PasswordError::InvalidHash)
        );
        let oversized = format!("{HASH_MARKER}{}", "x".repeat(MAX_STORED_PASSWORD_LENGTH));
        assert_eq!(
            Password::hashed(oversized).validate(),
            Err(PasswordError::InvalidHash)
        );
    }

    #[test]
    fn test_plaintext_with_marker_is_hashed() {
        // Only untyped input is sniffed; an explicit plaintext is always hashed
        let lookalike = format!("{HASH_MARKER}rounds=5000$notreally");
        let password = Password::plaintext(lookalike.clone());
        assert!(!password.is_hashed());

        let stored = password.to_stored().unwrap();
        assert_ne!(stored, lookalike);
        assert!(stored.starts_with(HASH_MARKER));
        assert!(verify_password(&lookalike, &stored).is_ok());
    }

    #[test]
    fn test_debug_redacts_plaintext() {
        let debug = format!("{:?}", Password::plaintext("super_secret_pw"));
        assert!(!debug.contains("super_secret_pw"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_password_error_display() {
        assert_eq!(
            PasswordError::TooShort.to_string(),
            "password must be at least 8 characters"
        );
        assert_eq!(
            PasswordError::TooLong.to_string(),
            "password must be at most 256 characters"
        );
        assert_eq!(
            PasswordError::VerificationFailed.to_string(),
            "password verification failed"
        );
    }
}
