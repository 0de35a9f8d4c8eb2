//! Domain model for VMAPP.

use std::fmt;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::validation::hostname_chars;

/// Domain entity representing a hosted mail domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    /// Unique domain ID.
    pub id: i64,
    /// Hostname (unique).
    pub domain: String,
    /// Whether mail for this domain is accepted.
    pub is_enabled: bool,
    /// Creation timestamp.
    pub ctime: DateTime<Utc>,
    /// Last modification timestamp.
    pub mtime: DateTime<Utc>,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.domain)
    }
}

/// Data for creating a new domain.
#[derive(Debug, Clone, Validate)]
pub struct NewDomain {
    /// Hostname.
    #[validate(
        length(min = 1, max = 255, message = "Hostname must be 1 to 255 characters"),
        custom(function = "hostname_chars")
    )]
    pub domain: String,
    /// Whether the domain is enabled (defaults to true).
    pub is_enabled: bool,
}

impl NewDomain {
    /// Create a new enabled domain.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            is_enabled: true,
        }
    }

    /// Set the enabled flag.
    pub fn with_enabled(mut self, is_enabled: bool) -> Self {
        self.is_enabled = is_enabled;
        self
    }
}

/// Data for updating an existing domain.
#[derive(Debug, Clone, Default, Validate)]
pub struct DomainUpdate {
    /// New hostname.
    #[validate(
        length(min = 1, max = 255, message = "Hostname must be 1 to 255 characters"),
        custom(function = "hostname_chars")
    )]
    pub domain: Option<String>,
    /// New enabled flag.
    pub is_enabled: Option<bool>,
}

impl DomainUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new hostname.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set enabled flag.
    pub fn is_enabled(mut self, is_enabled: bool) -> Self {
        self.is_enabled = Some(is_enabled);
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.domain.is_none() && self.is_enabled.is_none()
    }
}
