//! Maps every `ClusterTransport` call onto its `/api2/json` endpoint.

use crate::core::domain::{
    cluster_transport::ClusterTransport,
    error::ProxmoxResult,
    model::{
        ha::{HaGroup, HaGroupParams, HaResource, HaResourceParams},
        node::{NetworkInterface, NodeListItem, NodeService},
        storage::{ContentType, StorageContent, StorageListItem},
        vm::{CreateVmParams, DeleteVmOptions, StartVmOptions, StopVmOptions, VmListItem},
    },
    value_object::VmId,
};
use crate::core::infrastructure::api_client::ApiClient;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct StorageQuery {
    content: Option<ContentType>,
}

#[derive(Serialize)]
struct VmListQuery {
    full: bool,
}

/// Empty JSON object for POSTs that take no parameters.
fn no_params() -> Value {
    Value::Object(Default::default())
}

#[async_trait]
impl ClusterTransport for ApiClient {
    async fn nodes(&self) -> ProxmoxResult<Vec<NodeListItem>> {
        self.get("nodes").await
    }

    async fn node_network(&self, node: &str) -> ProxmoxResult<Vec<NetworkInterface>> {
        self.get(&format!("nodes/{}/network", node)).await
    }

    async fn node_services(&self, node: &str) -> ProxmoxResult<Vec<NodeService>> {
        self.get(&format!("nodes/{}/services", node)).await
    }

    async fn node_storages(
        &self,
        node: &str,
        content: Option<ContentType>,
    ) -> ProxmoxResult<Vec<StorageListItem>> {
        self.get_with_query(&format!("nodes/{}/storage", node), &StorageQuery { content })
            .await
    }

    async fn storage_content(
        &self,
        node: &str,
        storage: &str,
    ) -> ProxmoxResult<Vec<StorageContent>> {
        self.get(&format!("nodes/{}/storage/{}/content", node, storage))
            .await
    }

    async fn node_vms(&self, node: &str) -> ProxmoxResult<Vec<VmListItem>> {
        self.get_with_query(&format!("nodes/{}/qemu", node), &VmListQuery { full: true })
            .await
    }

    async fn create_vm(&self, node: &str, params: &CreateVmParams) -> ProxmoxResult<String> {
        self.post(&format!("nodes/{}/qemu", node), params).await
    }

    async fn delete_vm(
        &self,
        node: &str,
        vmid: VmId,
        options: &DeleteVmOptions,
    ) -> ProxmoxResult<String> {
        self.delete_with_query(&format!("nodes/{}/qemu/{}", node, vmid), options)
            .await
    }

    async fn start_vm(
        &self,
        node: &str,
        vmid: VmId,
        options: &StartVmOptions,
    ) -> ProxmoxResult<String> {
        self.post(&format!("nodes/{}/qemu/{}/status/start", node, vmid), options)
            .await
    }

    async fn stop_vm(
        &self,
        node: &str,
        vmid: VmId,
        options: &StopVmOptions,
    ) -> ProxmoxResult<String> {
        self.post(&format!("nodes/{}/qemu/{}/status/stop", node, vmid), options)
            .await
    }

    async fn agent_command(&self, node: &str, vmid: VmId, command: &str) -> ProxmoxResult<Value> {
        self.post(
            &format!("nodes/{}/qemu/{}/agent/{}", node, vmid, command),
            &no_params(),
        )
        .await
    }

    async fn ha_groups(&self) -> ProxmoxResult<Vec<HaGroup>> {
        self.get("cluster/ha/groups").await
    }

    async fn create_ha_group(&self, params: &HaGroupParams) -> ProxmoxResult<()> {
        let _: Value = self.post("cluster/ha/groups", params).await?;
        Ok(())
    }

    async fn delete_ha_group(&self, group: &str) -> ProxmoxResult<()> {
        let _: Value = self.delete(&format!("cluster/ha/groups/{}", group)).await?;
        Ok(())
    }

    async fn ha_resources(&self) -> ProxmoxResult<Vec<HaResource>> {
        self.get("cluster/ha/resources").await
    }

    async fn create_ha_resource(&self, params: &HaResourceParams) -> ProxmoxResult<()> {
        let _: Value = self.post("cluster/ha/resources", params).await?;
        Ok(())
    }

    async fn delete_ha_resource(&self, sid: &str) -> ProxmoxResult<()> {
        let _: Value = self
            .delete(&format!("cluster/ha/resources/{}", sid))
            .await?;
        Ok(())
    }
}
