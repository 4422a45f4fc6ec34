//! Cluster-wide views assembled from per-node queries.

use crate::core::domain::{
    cluster_transport::ClusterTransport,
    config::FanOut,
    error::{ProxmoxError, ProxmoxResult},
    merge::{attach_disks, attach_ha_resources, dedup, merge_storages},
    model::{
        ha::ClusterHaGroup,
        node::ClusterNode,
        storage::{ClusterStorage, ContentType, StorageContent},
        vm::ClusterVm,
    },
};
use futures::future::try_join_all;
use std::future::Future;
use tracing::debug;

/// Reads the cluster through a [`ClusterTransport`] and merges the per-node
/// answers.
///
/// Every view starts with the node list. Per-node queries are issued
/// according to the [`FanOut`] mode, and their results are always merged in
/// node-list order. The first failing query fails the whole view.
pub struct ClusterAggregator<'a, T: ClusterTransport> {
    transport: &'a T,
    fan_out: FanOut,
}

impl<'a, T: ClusterTransport> ClusterAggregator<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self {
            transport,
            fan_out: FanOut::default(),
        }
    }

    pub fn with_fan_out(mut self, fan_out: FanOut) -> Self {
        self.fan_out = fan_out;
        self
    }

    /// Every node with its network interfaces and services attached.
    pub async fn get_nodes(&self) -> ProxmoxResult<Vec<ClusterNode>> {
        let transport = self.transport;
        let nodes = transport.nodes().await?;
        debug!(count = nodes.len(), "Listed nodes");

        let names: Vec<String> = nodes.iter().map(|n| n.node.clone()).collect();
        let details = self
            .for_each(&names, |node| async move {
                let network = transport.node_network(node).await?;
                let services = transport.node_services(node).await?;
                Ok::<_, ProxmoxError>((network, services))
            })
            .await?;

        Ok(nodes
            .into_iter()
            .zip(details)
            .map(|(info, (network, services))| ClusterNode {
                info,
                network,
                services,
            })
            .collect())
    }

    /// Every storage in the cluster with its contents.
    ///
    /// Local storages appear once per node, tagged with it. A shared storage
    /// appears once, as first listed, without a node.
    pub async fn get_storages(&self) -> ProxmoxResult<Vec<ClusterStorage>> {
        let transport = self.transport;
        let nodes = self.node_names().await?;

        let listings = self
            .for_each(&nodes, |node| async move {
                transport.node_storages(node, None).await
            })
            .await?;
        let listed: usize = listings.iter().map(Vec::len).sum();
        let kept = merge_storages(nodes.iter().cloned().zip(listings));
        debug!(
            listed,
            kept = kept.len(),
            skipped = listed - kept.len(),
            "Merged storages"
        );

        let contents = self
            .for_each(&kept, |(node, storage)| async move {
                transport.storage_content(node, &storage.storage).await
            })
            .await?;

        Ok(kept
            .into_iter()
            .zip(contents)
            .map(|((node, info), contents)| ClusterStorage::new(info, &node, contents))
            .collect())
    }

    /// Every VM, tagged with its node, with its disks attached.
    ///
    /// Disks are read from each node's `images` storages. A shared storage is
    /// listed by several nodes, so volumes are deduplicated by volid before
    /// being matched to VMs by id.
    pub async fn get_vms(&self) -> ProxmoxResult<Vec<ClusterVm>> {
        let transport = self.transport;
        let nodes = self.node_names().await?;

        let vm_lists = self
            .for_each(&nodes, |node| async move { transport.node_vms(node).await })
            .await?;
        let mut vms: Vec<ClusterVm> = nodes
            .iter()
            .zip(vm_lists)
            .flat_map(|(node, list)| {
                list.into_iter().map(move |info| ClusterVm {
                    info,
                    node: node.clone(),
                    disks: Vec::new(),
                })
            })
            .collect();

        let disk_lists = self
            .for_each(&nodes, |node| async move {
                let storages = transport
                    .node_storages(node, Some(ContentType::Images))
                    .await?;
                let mut volumes = Vec::new();
                for storage in &storages {
                    volumes.extend(transport.storage_content(node, &storage.storage).await?);
                }
                Ok::<_, ProxmoxError>(volumes)
            })
            .await?;
        let volumes: Vec<StorageContent> = disk_lists.into_iter().flatten().collect();
        let found = volumes.len();
        let disks = dedup(volumes, |disk| disk.volid.clone());
        debug!(
            vms = vms.len(),
            volumes = found,
            unique = disks.len(),
            "Deduplicated disks"
        );

        attach_disks(&mut vms, disks);
        Ok(vms)
    }

    /// Every HA group with the resources bound to it.
    pub async fn get_ha_groups(&self) -> ProxmoxResult<Vec<ClusterHaGroup>> {
        let (groups, resources) = match self.fan_out {
            FanOut::Sequential => (
                self.transport.ha_groups().await?,
                self.transport.ha_resources().await?,
            ),
            FanOut::Concurrent => {
                futures::try_join!(self.transport.ha_groups(), self.transport.ha_resources())?
            }
        };
        debug!(
            groups = groups.len(),
            resources = resources.len(),
            "Listed HA configuration"
        );
        Ok(attach_ha_resources(groups, resources))
    }

    async fn node_names(&self) -> ProxmoxResult<Vec<String>> {
        let nodes = self.transport.nodes().await?;
        debug!(count = nodes.len(), "Listed nodes");
        Ok(nodes.into_iter().map(|n| n.node).collect())
    }

    /// Runs `query` for every item, returning the answers in item order.
    async fn for_each<'b, I, R, F, Fut>(&self, items: &'b [I], query: F) -> ProxmoxResult<Vec<R>>
    where
        F: Fn(&'b I) -> Fut,
        Fut: Future<Output = ProxmoxResult<R>>,
    {
        match self.fan_out {
            FanOut::Sequential => {
                let mut answers = Vec::with_capacity(items.len());
                for item in items {
                    answers.push(query(item).await?);
                }
                Ok(answers)
            }
            FanOut::Concurrent => try_join_all(items.iter().map(query)).await,
        }
    }
}
