//! Raw mailbox form input.

use validator::{Validate, ValidationErrors};

use crate::auth::Password;
use crate::users::NewUser;
use crate::validation::parse_integer;

/// Mailbox form as submitted by an administrator.
///
/// Numeric fields arrive as text and are parsed here, so that an
/// unparseable domain reference or quota is reported together with the
/// other field errors.
#[derive(Debug, Clone, Default)]
pub struct UserForm {
    /// Owning domain ID.
    pub domain: String,
    /// Mailbox name.
    pub username: String,
    /// Plaintext password, or an existing `{SHA512-CRYPT}$6$` hash.
    pub password: String,
    /// Quota in megabytes; blank means the default.
    pub quota: String,
    /// Enabled checkbox.
    pub is_enabled: bool,
}

impl UserForm {
    /// Parse and validate the form into a [`NewUser`].
    pub fn to_new_user(&self, default_quota_mb: i64) -> Result<NewUser, ValidationErrors> {
        let domain_id = parse_integer(&self.domain);
        let quota = if self.quota.trim().is_empty() {
            Ok(default_quota_mb)
        } else {
            parse_integer(&self.quota)
        };

        let new_user = NewUser::new(
            domain_id.as_ref().copied().unwrap_or_default(),
            self.username.trim(),
            Password::from_input(self.password.as_str()),
        )
        .with_quota(quota.as_ref().copied().unwrap_or(default_quota_mb))
        .with_enabled(self.is_enabled);

        let mut errors = match new_user.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        if let Err(e) = domain_id {
            errors.add("domain", e);
        }
        if let Err(e) = quota {
            errors.add("quota", e);
        }

        if errors.is_empty() {
            Ok(new_user)
        } else {
            Err(errors)
        }
    }
}
