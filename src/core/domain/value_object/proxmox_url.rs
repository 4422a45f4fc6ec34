use crate::core::domain::error::ValidationError;
use crate::core::domain::value_object::{ProxmoxHost, ProxmoxPort};

/// Maximum URL length accepted (RFC 7230 practical limit).
const MAX_URL_LENGTH: usize = 2083;

/// The base URL of a Proxmox server, e.g. `https://pve.example.com:8006/`.
///
/// API paths are joined onto it by the HTTP client; the URL itself always
/// ends with a single `/`.
#[derive(Debug, Clone)]
pub struct ProxmoxUrl(String);

impl ProxmoxUrl {
    /// Creates a new URL without validation.
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self(value)
    }

    /// Builds the base URL from validated parts.
    pub(crate) fn from_parts(
        host: &ProxmoxHost,
        port: &ProxmoxPort,
        secure: bool,
    ) -> Result<Self, ValidationError> {
        let scheme = if secure { "https" } else { "http" };
        let host = match host.as_str().parse::<std::net::Ipv6Addr>() {
            Ok(_) => format!("[{}]", host.as_str()),
            Err(_) => host.as_str().to_string(),
        };
        let value = format!("{}://{}:{}/", scheme, host, port.get());
        validate_url(&value)?;
        Ok(Self::new_unchecked(value))
    }

    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves an API path (e.g. `nodes/pve1/qemu`) under `/api2/json/`.
    pub(crate) fn api_url(&self, path: &str) -> Result<url::Url, ValidationError> {
        let base = self.0.trim_end_matches('/');
        let full = format!("{}/api2/json/{}", base, path.trim_start_matches('/'));
        url::Url::parse(&full)
            .map_err(|e| ValidationError::Format(format!("Invalid API path '{}': {}", path, e)))
    }
}

/// Validates a base URL: http(s) scheme, bounded length, parseable.
pub(crate) fn validate_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::Field {
            field: "url".to_string(),
            message: "URL cannot be empty".to_string(),
        });
    }

    if url.len() > MAX_URL_LENGTH {
        return Err(ValidationError::Format(format!(
            "URL exceeds maximum length of {} characters",
            MAX_URL_LENGTH
        )));
    }

    let parsed = url::Url::parse(url)
        .map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::ConstraintViolation(
            "Invalid scheme. Must be one of: https, http".to_string(),
        ));
    }

    Ok(())
}
