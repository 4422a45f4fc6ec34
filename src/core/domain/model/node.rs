//! Domain models for cluster nodes.
//!
//! `NodeListItem`, `NetworkInterface` and `NodeService` mirror the records
//! returned by `/nodes`, `/nodes/{node}/network` and `/nodes/{node}/services`.
//! `ClusterNode` is the aggregated view combining the three.

use crate::core::domain::value_object::serde_helpers::option_int_bool;
use serde::{Deserialize, Serialize};

/// A node as returned by the `/api2/json/nodes` endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NodeListItem {
    /// The node name (e.g., "pve1").
    pub node: String,
    /// Current node status (e.g., "online", "offline", "unknown").
    pub status: String,
    /// CPU usage fraction (0.0 to 1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,
    /// Number of logical CPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxcpu: Option<u32>,
    /// Memory usage in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem: Option<u64>,
    /// Total memory in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxmem: Option<u64>,
    /// Root filesystem usage in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<u64>,
    /// Root filesystem size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxdisk: Option<u64>,
    /// System uptime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// Resource identifier (e.g., "node/pve1").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// SSL certificate fingerprint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_fingerprint: Option<String>,
}

/// A network interface from `/nodes/{node}/network`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NetworkInterface {
    /// Interface name (e.g., "vmbr0", "eno1").
    pub iface: String,
    /// Interface kind (e.g., "bridge", "eth", "bond").
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub iface_type: Option<String>,
    /// Free-text comment; empty when none is configured.
    #[serde(default)]
    pub comments: String,
    /// IPv4 address in CIDR notation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(
        default,
        with = "option_int_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub active: Option<bool>,
    #[serde(
        default,
        with = "option_int_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub autostart: Option<bool>,
}

/// A system service from `/nodes/{node}/services`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NodeService {
    /// Service id (e.g., "pveproxy").
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Current state (e.g., "running", "stopped").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// A node enriched with its network interfaces and services.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClusterNode {
    #[serde(flatten)]
    pub info: NodeListItem,
    pub network: Vec<NetworkInterface>,
    pub services: Vec<NodeService>,
}

impl ClusterNode {
    /// Node name, shorthand for `info.node`.
    pub fn name(&self) -> &str {
        &self.info.node
    }

    /// Memory in use as a fraction of total memory, when both are reported.
    pub fn memory_fraction(&self) -> Option<f64> {
        match (self.info.mem, self.info.maxmem) {
            (Some(used), Some(total)) if total > 0 => Some(used as f64 / total as f64),
            _ => None,
        }
    }

    pub fn service_names(&self) -> Vec<&str> {
        self.services.iter().map(|s| s.service.as_str()).collect()
    }
}
