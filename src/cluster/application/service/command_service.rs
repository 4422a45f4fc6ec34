//! Single-call VM lifecycle, HA membership and guest agent commands.

use crate::core::domain::{
    cluster_transport::ClusterTransport,
    error::{ProxmoxResult, ValidationError},
    model::{
        agent::FstrimResult,
        ha::{HaAddOptions, HaGroupParams, HaResourceParams},
        vm::{CreateVmParams, DeleteVmOptions, StartVmOptions, StopVmOptions},
    },
    value_object::{VmId, validate_vm_id},
};
use serde_json::Value;
use tracing::{info, warn};

/// Issues commands through a [`ClusterTransport`].
///
/// VM ids are range-checked before anything is sent; transport errors are
/// returned as they are, except by [`ClusterCommands::fstrim_vm`].
pub struct ClusterCommands<'a, T: ClusterTransport> {
    transport: &'a T,
}

impl<'a, T: ClusterTransport> ClusterCommands<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Creates a VM on `node`, returning the task UPID.
    pub async fn create_vm(&self, node: &str, params: &CreateVmParams) -> ProxmoxResult<String> {
        validate_vm_id(params.vmid.get())?;
        info!(node, vmid = %params.vmid, "Creating VM");
        self.transport.create_vm(node, params).await
    }

    /// Destroys a VM, returning the task UPID.
    pub async fn delete_vm(
        &self,
        node: &str,
        vmid: VmId,
        options: &DeleteVmOptions,
    ) -> ProxmoxResult<String> {
        validate_vm_id(vmid.get())?;
        info!(node, %vmid, "Deleting VM");
        self.transport.delete_vm(node, vmid, options).await
    }

    pub async fn start_vm(
        &self,
        node: &str,
        vmid: VmId,
        options: &StartVmOptions,
    ) -> ProxmoxResult<String> {
        validate_vm_id(vmid.get())?;
        info!(node, %vmid, "Starting VM");
        self.transport.start_vm(node, vmid, options).await
    }

    /// Hard-stops a VM (no guest shutdown).
    pub async fn stop_vm(
        &self,
        node: &str,
        vmid: VmId,
        options: &StopVmOptions,
    ) -> ProxmoxResult<String> {
        validate_vm_id(vmid.get())?;
        info!(node, %vmid, "Stopping VM");
        self.transport.stop_vm(node, vmid, options).await
    }

    /// Puts a VM under HA management as `vm:<vmid>`.
    pub async fn ha_add_vm(&self, vmid: VmId, options: &HaAddOptions) -> ProxmoxResult<()> {
        validate_vm_id(vmid.get())?;
        let params = HaResourceParams {
            sid: vmid.ha_sid(),
            options: options.clone(),
        };
        info!(sid = %params.sid, group = ?options.group, "Adding HA resource");
        self.transport.create_ha_resource(&params).await
    }

    pub async fn ha_remove_vm(&self, vmid: VmId) -> ProxmoxResult<()> {
        validate_vm_id(vmid.get())?;
        let sid = vmid.ha_sid();
        info!(%sid, "Removing HA resource");
        self.transport.delete_ha_resource(&sid).await
    }

    /// Trims the guest's filesystems through the QEMU guest agent.
    ///
    /// Never fails: any error, including an out-of-range id, is returned as
    /// [`FstrimResult::Failed`].
    pub async fn fstrim_vm(&self, node: &str, vmid: VmId) -> FstrimResult {
        match self.agent(node, vmid, "fstrim").await {
            Ok(answer) => {
                info!(node, %vmid, "Trimmed guest filesystems");
                FstrimResult::Completed(answer)
            }
            Err(error) => {
                warn!(node, %vmid, %error, "fstrim failed");
                FstrimResult::Failed {
                    error: error.to_string(),
                }
            }
        }
    }

    /// Checks that the guest agent answers.
    pub async fn ping_agent(&self, node: &str, vmid: VmId) -> ProxmoxResult<Value> {
        self.agent(node, vmid, "ping").await
    }

    pub async fn create_ha_group(&self, params: &HaGroupParams) -> ProxmoxResult<()> {
        if params.group.trim().is_empty() {
            return Err(ValidationError::Field {
                field: "group".to_string(),
                message: "HA group name cannot be empty".to_string(),
            }
            .into());
        }
        if params.nodes.trim().is_empty() {
            return Err(ValidationError::Field {
                field: "nodes".to_string(),
                message: "HA group needs at least one node".to_string(),
            }
            .into());
        }
        info!(group = %params.group, nodes = %params.nodes, "Creating HA group");
        self.transport.create_ha_group(params).await
    }

    pub async fn delete_ha_group(&self, group: &str) -> ProxmoxResult<()> {
        info!(group, "Deleting HA group");
        self.transport.delete_ha_group(group).await
    }

    async fn agent(&self, node: &str, vmid: VmId, command: &str) -> ProxmoxResult<Value> {
        validate_vm_id(vmid.get())?;
        self.transport.agent_command(node, vmid, command).await
    }
}
