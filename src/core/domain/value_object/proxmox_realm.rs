use crate::core::domain::error::ValidationError;

/// Realms that exist on every Proxmox VE installation.
pub const BUILTIN_REALMS: [&str; 2] = ["pam", "pve"];

/// A validated Proxmox authentication realm (`pam`, `pve`, or a configured LDAP/AD realm id).
#[derive(Debug, Clone)]
pub struct ProxmoxRealm(String);

impl ProxmoxRealm {
    /// Creates a new realm without validation.
    pub(crate) fn new_unchecked(realm: String) -> Self {
        Self(realm)
    }

    /// Returns the realm as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for `pam` and `pve`.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        BUILTIN_REALMS.contains(&self.0.as_str())
    }
}

/// Validates a realm identifier: 2 to 32 characters of `a-z`, `0-9`, `-` or `_`.
pub(crate) fn validate_realm(realm: &str) -> Result<(), ValidationError> {
    if realm.is_empty() {
        return Err(ValidationError::Field {
            field: "realm".to_string(),
            message: "Realm cannot be empty".to_string(),
        });
    }

    if realm.len() < 2 || realm.len() > 32 {
        return Err(ValidationError::Format(
            "Realm length must be between 2 and 32 characters".to_string(),
        ));
    }

    let allowed = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_';
    if !realm.chars().all(allowed) {
        return Err(ValidationError::Format(
            "Realm contains invalid characters".to_string(),
        ));
    }

    Ok(())
}
