use crate::core::domain::error::ValidationError;
use std::time::{Duration, Instant};

/// A Proxmox authentication ticket, sent back as the `PVEAuthCookie` cookie.
#[derive(Debug, Clone)]
pub struct ProxmoxTicket {
    value: String,
    issued_at: Instant,
}

impl ProxmoxTicket {
    /// Creates a new ticket without validation.
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self {
            value,
            issued_at: Instant::now(),
        }
    }

    /// Validates `value` and stamps it as issued now.
    pub(crate) fn parse(value: String) -> Result<Self, ValidationError> {
        validate_ticket(&value)?;
        Ok(Self::new_unchecked(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns `true` once the ticket is older than `lifetime`.
    #[must_use]
    pub fn is_expired(&self, lifetime: Duration) -> bool {
        self.issued_at.elapsed() > lifetime
    }

    #[must_use]
    pub fn as_cookie_header(&self) -> String {
        format!("PVEAuthCookie={}", self.value)
    }
}

/// Validates the `PVE:<user>@<realm>:<hex>::<signature>` ticket layout.
pub(crate) fn validate_ticket(ticket: &str) -> Result<(), ValidationError> {
    if ticket.is_empty() {
        return Err(ValidationError::Field {
            field: "ticket".to_string(),
            message: "Ticket cannot be empty".to_string(),
        });
    }
    let parts: Vec<&str> = ticket.split(':').collect();
    if parts.len() < 5 || parts[0] != "PVE" {
        return Err(ValidationError::Format(
            "Invalid ticket format: must start with 'PVE:' and have at least 5 parts".to_string(),
        ));
    }
    Ok(())
}
