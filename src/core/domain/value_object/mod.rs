mod proxmox_csrf_token;
mod proxmox_host;
mod proxmox_password;
mod proxmox_port;
mod proxmox_realm;
mod proxmox_ticket;
mod proxmox_url;
mod proxmox_username;
pub(crate) mod serde_helpers;
mod vm_id;

pub use proxmox_csrf_token::ProxmoxCSRFToken;
pub use proxmox_host::ProxmoxHost;
pub use proxmox_password::ProxmoxPassword;
pub use proxmox_port::{DEFAULT_PORT, ProxmoxPort};
pub use proxmox_realm::ProxmoxRealm;
pub use proxmox_ticket::ProxmoxTicket;
pub use proxmox_url::ProxmoxUrl;
pub use proxmox_username::ProxmoxUsername;
pub use vm_id::{MAX_VM_ID, MIN_VM_ID, VmId};

// Re-export validation functions for internal use
pub(crate) use proxmox_host::{resolve_host, validate_host};
pub(crate) use proxmox_password::validate_password;
pub(crate) use proxmox_port::validate_port;
pub(crate) use proxmox_realm::validate_realm;
pub(crate) use proxmox_username::validate_username;
pub(crate) use vm_id::validate_vm_id;
