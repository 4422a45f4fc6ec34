//! The remote calls the aggregation and command services depend on.
//!
//! `ApiClient` implements this trait against the Proxmox REST API; tests use
//! the generated `MockClusterTransport`.

use crate::core::domain::{
    error::ProxmoxResult,
    model::{
        ha::{HaGroup, HaGroupParams, HaResource, HaResourceParams},
        node::{NetworkInterface, NodeListItem, NodeService},
        storage::{ContentType, StorageContent, StorageListItem},
        vm::{CreateVmParams, DeleteVmOptions, StartVmOptions, StopVmOptions, VmListItem},
    },
    value_object::VmId,
};
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClusterTransport: Send + Sync {
    /// `GET /nodes`
    async fn nodes(&self) -> ProxmoxResult<Vec<NodeListItem>>;

    /// `GET /nodes/{node}/network`
    async fn node_network(&self, node: &str) -> ProxmoxResult<Vec<NetworkInterface>>;

    /// `GET /nodes/{node}/services`
    async fn node_services(&self, node: &str) -> ProxmoxResult<Vec<NodeService>>;

    /// `GET /nodes/{node}/storage`, optionally filtered by content type.
    async fn node_storages(
        &self,
        node: &str,
        content: Option<ContentType>,
    ) -> ProxmoxResult<Vec<StorageListItem>>;

    /// `GET /nodes/{node}/storage/{storage}/content`
    async fn storage_content(&self, node: &str, storage: &str)
    -> ProxmoxResult<Vec<StorageContent>>;

    /// `GET /nodes/{node}/qemu?full=1`
    async fn node_vms(&self, node: &str) -> ProxmoxResult<Vec<VmListItem>>;

    /// `POST /nodes/{node}/qemu`; returns the task UPID.
    async fn create_vm(&self, node: &str, params: &CreateVmParams) -> ProxmoxResult<String>;

    /// `DELETE /nodes/{node}/qemu/{vmid}`; returns the task UPID.
    async fn delete_vm(
        &self,
        node: &str,
        vmid: VmId,
        options: &DeleteVmOptions,
    ) -> ProxmoxResult<String>;

    /// `POST /nodes/{node}/qemu/{vmid}/status/start`; returns the task UPID.
    async fn start_vm(
        &self,
        node: &str,
        vmid: VmId,
        options: &StartVmOptions,
    ) -> ProxmoxResult<String>;

    /// `POST /nodes/{node}/qemu/{vmid}/status/stop`; returns the task UPID.
    async fn stop_vm(
        &self,
        node: &str,
        vmid: VmId,
        options: &StopVmOptions,
    ) -> ProxmoxResult<String>;

    /// `POST /nodes/{node}/qemu/{vmid}/agent/{command}`
    async fn agent_command(
        &self,
        node: &str,
        vmid: VmId,
        command: &str,
    ) -> ProxmoxResult<serde_json::Value>;

    /// `GET /cluster/ha/groups`
    async fn ha_groups(&self) -> ProxmoxResult<Vec<HaGroup>>;

    /// `POST /cluster/ha/groups`
    async fn create_ha_group(&self, params: &HaGroupParams) -> ProxmoxResult<()>;

    /// `DELETE /cluster/ha/groups/{group}`
    async fn delete_ha_group(&self, group: &str) -> ProxmoxResult<()>;

    /// `GET /cluster/ha/resources`
    async fn ha_resources(&self) -> ProxmoxResult<Vec<HaResource>>;

    /// `POST /cluster/ha/resources`
    async fn create_ha_resource(&self, params: &HaResourceParams) -> ProxmoxResult<()>;

    /// `DELETE /cluster/ha/resources/{sid}`
    async fn delete_ha_resource(&self, sid: &str) -> ProxmoxResult<()>;
}
