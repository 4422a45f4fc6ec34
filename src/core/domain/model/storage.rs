//! Domain models for storage backends and their contents.

use crate::core::domain::value_object::VmId;
use crate::core::domain::value_object::serde_helpers::{int_bool, option_int_bool};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content types a storage can hold; used to filter `/nodes/{node}/storage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// VM disk images.
    Images,
    /// Container root directories.
    Rootdir,
    Iso,
    Vztmpl,
    Backup,
    Snippets,
    Import,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Images => "images",
            ContentType::Rootdir => "rootdir",
            ContentType::Iso => "iso",
            ContentType::Vztmpl => "vztmpl",
            ContentType::Backup => "backup",
            ContentType::Snippets => "snippets",
            ContentType::Import => "import",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A storage as seen from one node (`/nodes/{node}/storage`).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageListItem {
    /// Storage id (e.g., "local", "nfs-backup").
    pub storage: String,
    /// Plugin type (e.g., "dir", "nfs", "zfspool", "rbd").
    #[serde(rename = "type")]
    pub storage_type: String,
    /// Comma-separated content tags (e.g., "images,rootdir").
    #[serde(default)]
    pub content: String,
    /// Whether every node sees the same backend.
    #[serde(default, with = "int_bool")]
    pub shared: bool,
    /// Total capacity in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Used space in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used: Option<u64>,
    /// Available space in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avail: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_fraction: Option<f64>,
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
    pub enabled: Option<bool>,
}

impl StorageListItem {
    /// The content tags as a list.
    pub fn content_types(&self) -> Vec<&str> {
        self.content
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .collect()
    }

    /// Used space as a fraction of capacity, falling back to `used / total`.
    pub fn usage(&self) -> Option<f64> {
        self.used_fraction.or(match (self.used, self.total) {
            (Some(used), Some(total)) if total > 0 => Some(used as f64 / total as f64),
            _ => None,
        })
    }
}

/// A volume stored on a storage (`/nodes/{node}/storage/{storage}/content`).
///
/// On `images` storages each entry is a VM disk.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageContent {
    /// Volume id (e.g., "local-lvm:vm-100-disk-0").
    pub volid: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Owning guest, absent for ISO images, templates and the like.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vmid: Option<VmId>,
    /// Volume format (e.g., "raw", "qcow2", "iso").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Content type tag of this volume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Creation time (UNIX seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctime: Option<u64>,
    /// Bytes actually allocated (thin provisioning).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A storage in the cluster-wide view.
///
/// Shared storages appear once with no `node`; local storages appear once per
/// node and carry the node they belong to.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClusterStorage {
    #[serde(flatten)]
    pub info: StorageListItem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    node: Option<String>,
    pub contents: Vec<StorageContent>,
}

impl ClusterStorage {
    /// Builds the view of `info` as listed on `listed_on`; the node is only
    /// kept when the storage is not shared.
    pub fn new(info: StorageListItem, listed_on: &str, contents: Vec<StorageContent>) -> Self {
        let node = (!info.shared).then(|| listed_on.to_string());
        Self {
            info,
            node,
            contents,
        }
    }

    /// Storage id, shorthand for `info.storage`.
    pub fn name(&self) -> &str {
        &self.info.storage
    }

    /// The owning node, `None` for shared storage.
    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }
}
