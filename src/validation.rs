//! Field validators shared by the mail entities.
//!
//! The entity types derive `validator::Validate`; the functions here are the
//! `custom` rules those derives point at, plus helpers for parsing raw
//! admin input.

use std::borrow::Cow;

use validator::ValidationError;

use crate::auth::{Password, PasswordError};

/// Maximum hostname length (RFC 1035).
pub const MAX_DOMAIN_LENGTH: u64 = 255;

/// Maximum username (local part) length.
pub const MAX_USERNAME_LENGTH: u64 = 64;

/// Minimum length of an email address in an alias.
pub const MIN_EMAIL_LENGTH: u64 = 3;

/// Maximum length of an email address in an alias.
pub const MAX_EMAIL_LENGTH: u64 = 255;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Reject whitespace and control characters in a hostname.
pub fn hostname_chars(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(error(
            "hostname_chars",
            "Must not contain whitespace or control characters",
        ));
    }
    Ok(())
}

/// Reject whitespace, `@` and control characters in a mailbox username.
pub fn username_chars(value: &str) -> Result<(), ValidationError> {
    if value
        .chars()
        .any(|c| c == '@' || c.is_whitespace() || c.is_control())
    {
        return Err(error(
            "username_chars",
            "Must not contain '@', whitespace or control characters",
        ));
    }
    Ok(())
}

/// Apply the password length rules to a [`Password`].
pub fn password_rules(password: &Password) -> Result<(), ValidationError> {
    password.validate().map_err(|e| match e {
        PasswordError::TooShort => error("length", "Password must be at least 8 characters"),
        PasswordError::TooLong => error("length", "Password must be at most 256 characters"),
        _ => error("password_hash", "Stored password is not a SHA512-CRYPT hash"),
    })
}

/// Parse a required integer field from raw input.
///
/// Surrounding whitespace is ignored. Empty input reports `required`,
/// anything else that is not an integer reports `integer`.
pub fn parse_integer(value: &str) -> Result<i64, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error("required", "This field is required"));
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| error("integer", "Enter a whole number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostname_chars() {
        assert!(hostname_chars("example.com").is_ok());
        assert!(hostname_chars("a").is_ok());
        assert!(hostname_chars("exa mple.com").is_err());
        assert!(hostname_chars("example.com\n").is_err());
        assert!(hostname_chars("example\x00.com").is_err());
    }

    #[test]
    fn test_username_chars() {
        assert!(username_chars("john.doe").is_ok());
        assert!(username_chars("john+tag").is_ok());
        assert!(username_chars("john@example.com").is_err());
        assert!(username_chars("john doe").is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(password_rules(&Password::plaintext("12345678")).is_ok());

        let err = password_rules(&Password::plaintext("1234567")).unwrap_err();
        assert_eq!(err.code, "length");

        let err = password_rules(&Password::plaintext("a".repeat(257))).unwrap_err();
        assert_eq!(err.code, "length");

        let err = password_rules(&Password::hashed("nope")).unwrap_err();
        assert_eq!(err.code, "password_hash");
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("100").unwrap(), 100);
        assert_eq!(parse_integer(" 42 ").unwrap(), 42);
        assert_eq!(parse_integer("-10").unwrap(), -10);
        assert_eq!(parse_integer("").unwrap_err().code, "required");
        assert_eq!(parse_integer("abcd").unwrap_err().code, "integer");
        assert_eq!(parse_integer("1.5").unwrap_err().code, "integer");
    }
}
