pub mod agent;
pub mod api_response;
pub mod ha;
pub mod node;
pub mod proxmox_auth;
pub mod proxmox_connection;
pub mod storage;
pub mod vm;
