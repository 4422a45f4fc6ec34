//! Domain models for QEMU virtual machine operations.
//!
//! This module defines the structures used when listing VMs across the cluster
//! and the parameters accepted by the lifecycle commands.

use crate::core::domain::model::storage::StorageContent;
use crate::core::domain::value_object::VmId;
use crate::core::domain::value_object::serde_helpers::option_int_bool;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A virtual machine as returned by `/nodes/{node}/qemu?full=1`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VmListItem {
    /// The VM identifier (unique per cluster).
    pub vmid: VmId,
    /// Human-readable name (unset for freshly created VMs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Current status (e.g., "running", "stopped").
    pub status: String,
    /// Number of virtual CPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<u32>,
    /// CPU usage fraction (0.0 to 1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,
    /// Memory usage in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem: Option<u64>,
    /// Configured memory in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxmem: Option<u64>,
    /// Size of the boot disk in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxdisk: Option<u64>,
    /// Uptime in seconds (if running).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// QEMU monitor status (present with `full=1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qmpstatus: Option<String>,
    /// Semicolon-separated tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(
        default,
        with = "option_int_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub template: Option<bool>,
}

/// A VM in the cluster-wide view: the list record, its node and its disks.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClusterVm {
    #[serde(flatten)]
    pub info: VmListItem,
    pub node: String,
    pub disks: Vec<StorageContent>,
}

impl ClusterVm {
    pub fn vmid(&self) -> VmId {
        self.info.vmid
    }
}

/// Parameters for creating a new VM (`POST /nodes/{node}/qemu`).
///
/// The common options are typed; anything else Proxmox accepts (disks such as
/// `scsi0`, `ide2`, cloud-init keys, ...) goes into `extra`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateVmParams {
    /// VM identifier (required, must be unique in the cluster).
    pub vmid: VmId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Memory in MiB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sockets: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores: Option<u32>,
    /// CPU type (e.g., "host", "kvm64").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    /// Guest OS type (e.g., "l26", "win11").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ostype: Option<String>,
    /// First network device (e.g., "virtio,bridge=vmbr0").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net0: Option<String>,
    /// SCSI controller type (e.g., "virtio-scsi-pci").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scsihw: Option<String>,
    /// Boot order (e.g., "order=scsi0;net0").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boot: Option<String>,
    /// Enable the QEMU guest agent channel.
    #[serde(with = "option_int_bool", skip_serializing_if = "Option::is_none")]
    pub agent: Option<bool>,
    /// Start the VM once created.
    #[serde(with = "option_int_bool", skip_serializing_if = "Option::is_none")]
    pub start: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Any other option, passed through verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CreateVmParams {
    /// Parameters with only the VM id set.
    pub fn new(vmid: VmId) -> Self {
        Self {
            vmid,
            name: None,
            memory: None,
            sockets: None,
            cores: None,
            cpu: None,
            ostype: None,
            net0: None,
            scsihw: None,
            boot: None,
            agent: None,
            start: None,
            tags: None,
            description: None,
            extra: BTreeMap::new(),
        }
    }
}

/// Options for `DELETE /nodes/{node}/qemu/{vmid}`, sent as query parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DeleteVmOptions {
    /// Also remove the VM from backup jobs, replication and HA.
    #[serde(with = "option_int_bool", skip_serializing_if = "Option::is_none")]
    pub purge: Option<bool>,
    /// Also destroy disks that are not referenced by the config.
    #[serde(
        rename = "destroy-unreferenced-disks",
        with = "option_int_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub destroy_unreferenced_disks: Option<bool>,
    /// Ignore locks (root only).
    #[serde(with = "option_int_bool", skip_serializing_if = "Option::is_none")]
    pub skiplock: Option<bool>,
}

impl DeleteVmOptions {
    /// Delete and purge the VM from every job and HA.
    pub fn purge() -> Self {
        Self {
            purge: Some(true),
            ..Default::default()
        }
    }
}

/// Options for `POST /nodes/{node}/qemu/{vmid}/status/start`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StartVmOptions {
    /// Seconds to wait for the start to finish.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(with = "option_int_bool", skip_serializing_if = "Option::is_none")]
    pub skiplock: Option<bool>,
}

/// Options for `POST /nodes/{node}/qemu/{vmid}/status/stop`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StopVmOptions {
    /// Seconds to wait before giving up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(with = "option_int_bool", skip_serializing_if = "Option::is_none")]
    pub skiplock: Option<bool>,
    /// Keep block devices active (used by migration).
    #[serde(
        rename = "keepActive",
        with = "option_int_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub keep_active: Option<bool>,
    /// Abort a running shutdown task first.
    #[serde(
        rename = "overrule-shutdown",
        with = "option_int_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub overrule_shutdown: Option<bool>,
}
