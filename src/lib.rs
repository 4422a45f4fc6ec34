mod auth;
mod cluster;
mod core;

pub use crate::cluster::application::service::{
    aggregation_service::ClusterAggregator, command_service::ClusterCommands,
};
pub use crate::core::domain::{
    cluster_transport::ClusterTransport,
    config::{DEFAULT_TICKET_LIFETIME, FanOut, RateLimitConfig, ValidationConfig},
    error::{ProxmoxError, ProxmoxResult, ValidationError},
    merge::dedup,
    model::{
        agent::FstrimResult,
        ha::{
            ClusterHaGroup, HaAddOptions, HaGroup, HaGroupParams, HaResource, HaResourceParams,
            HaState,
        },
        node::{ClusterNode, NetworkInterface, NodeListItem, NodeService},
        proxmox_auth::ProxmoxAuth,
        proxmox_connection::ProxmoxConnection,
        storage::{ClusterStorage, ContentType, StorageContent, StorageListItem},
        vm::{
            ClusterVm, CreateVmParams, DeleteVmOptions, StartVmOptions, StopVmOptions, VmListItem,
        },
    },
    value_object::{
        DEFAULT_PORT, MAX_VM_ID, MIN_VM_ID, ProxmoxCSRFToken, ProxmoxHost, ProxmoxPassword,
        ProxmoxPort, ProxmoxRealm, ProxmoxTicket, ProxmoxUrl, ProxmoxUsername, VmId,
    },
};
pub use crate::core::infrastructure::api_client::ApiClient;

use crate::core::domain::value_object::{
    resolve_host, validate_host, validate_password, validate_port, validate_realm,
    validate_username,
};
use std::time::Duration;

/// A client for reading and driving a Proxmox VE cluster.
///
/// Reads (`get_*`) fan out over the cluster's nodes and return merged
/// cluster-wide views; commands are single API calls. The client logs in on
/// first use and renews its ticket on its own.
///
/// # Examples
///
/// ```no_run
/// use pve_cluster::{ProxmoxClient, ProxmoxResult};
///
/// #[tokio::main]
/// async fn main() -> ProxmoxResult<()> {
///     let client = ProxmoxClient::builder()
///         .host("proxmox.example.com")
///         .port(8006)
///         .credentials("user", "password", "pve")
///         .secure(true)
///         .build()
///         .await?;
///
///     client.login().await?;
///     for vm in client.get_vms().await? {
///         println!("{} on {}: {} disk(s)", vm.vmid(), vm.node, vm.disks.len());
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct ProxmoxClient {
    pub(crate) api_client: ApiClient,
    pub(crate) config: ValidationConfig,
    pub(crate) fan_out: FanOut,
}

/// Builder for ProxmoxClient configuration
#[derive(Debug, Default)]
pub struct ProxmoxClientBuilder {
    host: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    realm: Option<String>,
    secure: bool,
    accept_invalid_certs: bool,
    config: ValidationConfig,
    fan_out: FanOut,
}

impl ProxmoxClientBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Defaults to 8006.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        realm: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self.realm = Some(realm.into());
        self
    }

    /// Use https (`true`) or plain http.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Skip TLS certificate verification, for clusters with self-signed certificates.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Throttle outgoing requests to `requests_per_second`, allowing bursts of `burst_size`.
    pub fn rate_limit(mut self, requests_per_second: u32, burst_size: u32) -> Self {
        self.config.rate_limit = Some(RateLimitConfig {
            requests_per_second,
            burst_size,
        });
        self
    }

    pub fn ticket_lifetime(mut self, lifetime: Duration) -> Self {
        self.config.ticket_lifetime = lifetime;
        self
    }

    /// Reject passwords whose zxcvbn score is below `min_score`.
    pub fn enable_password_strength(mut self, min_score: zxcvbn::Score) -> Self {
        self.config.password_min_score = Some(min_score);
        self
    }

    pub fn block_reserved_usernames(mut self) -> Self {
        self.config.block_reserved_usernames = true;
        self
    }

    /// Check at build time that the host name resolves.
    pub fn resolve_dns(mut self, resolve: bool) -> Self {
        self.config.resolve_dns = resolve;
        self
    }

    /// How per-node queries are issued by the `get_*` views.
    pub fn fan_out(mut self, fan_out: FanOut) -> Self {
        self.fan_out = fan_out;
        self
    }

    /// Validates every part and assembles the client.
    ///
    /// # Errors
    /// `ProxmoxError::Validation` for the first missing or invalid field,
    /// `ProxmoxError::Connection` if the HTTP client cannot be created.
    pub async fn build(self) -> ProxmoxResult<ProxmoxClient> {
        let host = self.host.ok_or_else(|| required("host", "Host is required"))?;
        validate_host(&host)?;

        let port = self.port.unwrap_or(DEFAULT_PORT);
        validate_port(port)?;

        let username = self
            .username
            .ok_or_else(|| required("username", "Username is required"))?;
        validate_username(&username, self.config.block_reserved_usernames)?;

        let password = self
            .password
            .ok_or_else(|| required("password", "Password is required"))?;
        validate_password(&password, self.config.password_min_score)?;

        let realm = self
            .realm
            .ok_or_else(|| required("realm", "Realm is required"))?;
        validate_realm(&realm)?;

        if self.config.resolve_dns {
            resolve_host(&host, port, self.config.dns_timeout).await?;
        }

        let host = ProxmoxHost::new_unchecked(host);
        let port = ProxmoxPort::new_unchecked(port);
        let url = ProxmoxUrl::from_parts(&host, &port, self.secure)?;
        let connection = ProxmoxConnection::new(
            host,
            port,
            ProxmoxUsername::new_unchecked(username),
            ProxmoxPassword::new_unchecked(password),
            ProxmoxRealm::new_unchecked(realm),
            self.secure,
            self.accept_invalid_certs,
            url,
        );

        Ok(ProxmoxClient {
            api_client: ApiClient::new(connection, self.config.clone())?,
            config: self.config,
            fan_out: self.fan_out,
        })
    }
}

fn required(field: &str, message: &str) -> ValidationError {
    ValidationError::Field {
        field: field.to_string(),
        message: message.to_string(),
    }
}

impl ProxmoxClient {
    /// Creates a new builder for ProxmoxClient configuration
    pub fn builder() -> ProxmoxClientBuilder {
        ProxmoxClientBuilder::default()
    }

    /// Authenticates with the Proxmox server, replacing any current ticket.
    ///
    /// Calling this is optional: the first request logs in by itself. It is
    /// useful to surface bad credentials early.
    ///
    /// # Errors
    ///
    /// This method will return an error if:
    /// - The credentials are invalid
    /// - The server is unreachable
    /// - The response format is invalid
    pub async fn login(&self) -> ProxmoxResult<()> {
        self.api_client.login().await
    }

    /// Returns true if the client holds a non-expired ticket
    pub async fn is_authenticated(&self) -> bool {
        self.api_client.is_authenticated().await
    }

    /// Returns the current authentication ticket if authenticated
    pub async fn auth_token(&self) -> Option<ProxmoxTicket> {
        self.api_client.auth().await.map(|auth| auth.ticket().clone())
    }

    /// Returns the current CSRF token if authenticated
    pub async fn csrf_token(&self) -> Option<ProxmoxCSRFToken> {
        self.api_client
            .auth()
            .await
            .and_then(|auth| auth.csrf_token().cloned())
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn connection(&self) -> &ProxmoxConnection {
        self.api_client.connection()
    }

    /// The aggregation service over this client's transport.
    pub fn aggregator(&self) -> ClusterAggregator<'_, ApiClient> {
        ClusterAggregator::new(&self.api_client).with_fan_out(self.fan_out)
    }

    /// The command service over this client's transport.
    pub fn commands(&self) -> ClusterCommands<'_, ApiClient> {
        ClusterCommands::new(&self.api_client)
    }

    /// Every node with its network interfaces and services.
    pub async fn get_nodes(&self) -> ProxmoxResult<Vec<ClusterNode>> {
        self.aggregator().get_nodes().await
    }

    /// Every storage, shared ones counted once, with contents.
    pub async fn get_storages(&self) -> ProxmoxResult<Vec<ClusterStorage>> {
        self.aggregator().get_storages().await
    }

    /// Every VM with its owning node and disks.
    pub async fn get_vms(&self) -> ProxmoxResult<Vec<ClusterVm>> {
        self.aggregator().get_vms().await
    }

    /// Every HA group with its resources.
    pub async fn get_ha_groups(&self) -> ProxmoxResult<Vec<ClusterHaGroup>> {
        self.aggregator().get_ha_groups().await
    }

    pub async fn create_vm(&self, node: &str, params: &CreateVmParams) -> ProxmoxResult<String> {
        self.commands().create_vm(node, params).await
    }

    pub async fn delete_vm(
        &self,
        node: &str,
        vmid: VmId,
        options: &DeleteVmOptions,
    ) -> ProxmoxResult<String> {
        self.commands().delete_vm(node, vmid, options).await
    }

    pub async fn start_vm(
        &self,
        node: &str,
        vmid: VmId,
        options: &StartVmOptions,
    ) -> ProxmoxResult<String> {
        self.commands().start_vm(node, vmid, options).await
    }

    pub async fn stop_vm(
        &self,
        node: &str,
        vmid: VmId,
        options: &StopVmOptions,
    ) -> ProxmoxResult<String> {
        self.commands().stop_vm(node, vmid, options).await
    }

    pub async fn ha_add_vm(&self, vmid: VmId, options: &HaAddOptions) -> ProxmoxResult<()> {
        self.commands().ha_add_vm(vmid, options).await
    }

    pub async fn ha_remove_vm(&self, vmid: VmId) -> ProxmoxResult<()> {
        self.commands().ha_remove_vm(vmid).await
    }

    /// Trims the guest's filesystems; failures are reported in the result.
    pub async fn fstrim_vm(&self, node: &str, vmid: VmId) -> FstrimResult {
        self.commands().fstrim_vm(node, vmid).await
    }

    pub async fn ping_agent(&self, node: &str, vmid: VmId) -> ProxmoxResult<serde_json::Value> {
        self.commands().ping_agent(node, vmid).await
    }

    pub async fn create_ha_group(&self, params: &HaGroupParams) -> ProxmoxResult<()> {
        self.commands().create_ha_group(params).await
    }

    pub async fn delete_ha_group(&self, group: &str) -> ProxmoxResult<()> {
        self.commands().delete_ha_group(group).await
    }
}
