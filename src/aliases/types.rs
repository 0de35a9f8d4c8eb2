//! Alias model for VMAPP.

use chrono::{DateTime, Utc};
use validator::Validate;

/// Alias entity mapping `email` to `alias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    /// Unique alias ID.
    pub id: i64,
    /// Address the alias belongs to.
    pub email: String,
    /// Aliased address.
    pub alias: String,
    /// Whether the alias is active.
    pub is_enabled: bool,
    /// Creation timestamp.
    pub ctime: DateTime<Utc>,
    /// Last modification timestamp.
    pub mtime: DateTime<Utc>,
}

/// Data for creating a new alias.
#[derive(Debug, Clone, Validate)]
pub struct NewAlias {
    /// Address the alias belongs to.
    #[validate(
        length(min = 3, max = 255, message = "Address must be 3 to 255 characters"),
        email(message = "Enter a valid email address")
    )]
    pub email: String,
    /// Aliased address.
    #[validate(
        length(min = 3, max = 255, message = "Address must be 3 to 255 characters"),
        email(message = "Enter a valid email address")
    )]
    pub alias: String,
    /// Whether the alias is enabled (defaults to true).
    pub is_enabled: bool,
}

impl NewAlias {
    /// Create a new enabled alias.
    pub fn new(email: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            alias: alias.into(),
            is_enabled: true,
        }
    }

    /// Set the enabled flag.
    pub fn with_enabled(mut self, is_enabled: bool) -> Self {
        self.is_enabled = is_enabled;
        self
    }
}

/// Data for updating an existing alias.
#[derive(Debug, Clone, Default, Validate)]
pub struct AliasUpdate {
    /// New owning address.
    #[validate(
        length(min = 3, max = 255, message = "Address must be 3 to 255 characters"),
        email(message = "Enter a valid email address")
    )]
    pub email: Option<String>,
    /// New aliased address.
    #[validate(
        length(min = 3, max = 255, message = "Address must be 3 to 255 characters"),
        email(message = "Enter a valid email address")
    )]
    pub alias: Option<String>,
    /// New enabled flag.
    pub is_enabled: Option<bool>,
}

impl AliasUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new owning address.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set new aliased address.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Set enabled flag.
    pub fn is_enabled(mut self, is_enabled: bool) -> Self {
        self.is_enabled = Some(is_enabled);
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.alias.is_none() && self.is_enabled.is_none()
    }
}
