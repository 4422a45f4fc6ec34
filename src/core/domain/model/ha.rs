//! Domain models for the high-availability manager (`/cluster/ha`).

use crate::core::domain::value_object::serde_helpers::option_int_bool;
use serde::{Deserialize, Serialize};

/// An HA group from `/cluster/ha/groups`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HaGroup {
    /// Group name.
    pub group: String,
    #[serde(default)]
    pub comment: String,
    /// Member nodes with optional priority, e.g. "pve1:2,pve2".
    #[serde(default)]
    pub nodes: String,
    /// Resources may only run on member nodes.
    #[serde(
        default,
        with = "option_int_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub restricted: Option<bool>,
    /// Do not move resources back to a higher-priority node once it recovers.
    #[serde(
        default,
        with = "option_int_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub nofailback: Option<bool>,
}

impl HaGroup {
    /// Member node names, priorities stripped.
    pub fn node_names(&self) -> Vec<&str> {
        self.nodes
            .split(',')
            .map(|member| member.split(':').next().unwrap_or_default().trim())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// An HA-managed resource from `/cluster/ha/resources`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HaResource {
    /// Service id, e.g. "vm:100" or "ct:200".
    pub sid: String,
    /// Resource type ("vm" or "ct").
    #[serde(rename = "type", default)]
    pub resource_type: String,
    /// Requested state (e.g., "started", "stopped").
    #[serde(default)]
    pub state: String,
    /// Group the resource is bound to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_restart: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_relocate: Option<u32>,
}

/// An HA group in the cluster-wide view, with the resources bound to it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClusterHaGroup {
    #[serde(flatten)]
    pub info: HaGroup,
    pub resources: Vec<HaResource>,
}

/// Requested state of an HA resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HaState {
    Started,
    Stopped,
    Enabled,
    Disabled,
    Ignored,
}

/// Options for registering a VM with the HA manager.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HaAddOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<HaState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_restart: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_relocate: Option<u32>,
}

/// Body of `POST /cluster/ha/resources`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HaResourceParams {
    pub sid: String,
    #[serde(flatten)]
    pub options: HaAddOptions,
}

/// Body of `POST /cluster/ha/groups`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HaGroupParams {
    pub group: String,
    /// Member nodes, e.g. "pve1:2,pve2".
    pub nodes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(with = "option_int_bool", skip_serializing_if = "Option::is_none")]
    pub restricted: Option<bool>,
    #[serde(with = "option_int_bool", skip_serializing_if = "Option::is_none")]
    pub nofailback: Option<bool>,
}
