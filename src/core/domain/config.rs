//! Client configuration collected by `ProxmoxClientBuilder`.

use std::time::Duration;

/// Proxmox tickets are valid for two hours.
pub const DEFAULT_TICKET_LIFETIME: Duration = Duration::from_secs(2 * 60 * 60);

/// Token-bucket settings for outgoing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

/// Validation rules and transport settings applied by the client.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Age after which a ticket is refreshed before the next request.
    pub ticket_lifetime: Duration,
    /// Throttle requests when set.
    pub rate_limit: Option<RateLimitConfig>,
    /// Minimum zxcvbn score required for the password, if any.
    pub password_min_score: Option<zxcvbn::Score>,
    /// Reject well-known account names such as `root` and `admin`.
    pub block_reserved_usernames: bool,
    /// Resolve the host name at build time.
    pub resolve_dns: bool,
    /// Upper bound for that lookup.
    pub dns_timeout: Duration,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            ticket_lifetime: DEFAULT_TICKET_LIFETIME,
            rate_limit: None,
            password_min_score: None,
            block_reserved_usernames: false,
            resolve_dns: false,
            dns_timeout: Duration::from_secs(5),
        }
    }
}

/// How independent per-node queries are issued during aggregation.
///
/// Either way results are merged in node-list order, so both modes produce
/// the same output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanOut {
    /// One request at a time.
    #[default]
    Sequential,
    /// All per-node requests of one step in flight together.
    Concurrent,
}
