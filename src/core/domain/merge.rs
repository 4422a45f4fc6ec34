//! Merge rules turning per-node listings into cluster-wide views.
//!
//! Everything here is pure: the aggregation service performs the queries and
//! hands the results over in node-list order.

use crate::core::domain::model::{
    ha::{ClusterHaGroup, HaGroup, HaResource},
    storage::{StorageContent, StorageListItem},
    vm::ClusterVm,
};
use crate::core::domain::value_object::VmId;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Keeps the first item for every distinct key, preserving input order.
pub fn dedup<T, K, F>(items: impl IntoIterator<Item = T>, mut key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

/// Merges per-node storage listings.
///
/// Local storages are kept once per node. A shared storage is kept only the
/// first time its name shows up. Each kept record is returned with the node
/// it was listed on, which is where its contents must be read from.
pub fn merge_storages<I>(per_node: I) -> Vec<(String, StorageListItem)>
where
    I: IntoIterator<Item = (String, Vec<StorageListItem>)>,
{
    let mut seen_shared = HashSet::new();
    let mut merged = Vec::new();
    for (node, storages) in per_node {
        for storage in storages {
            if storage.shared && !seen_shared.insert(storage.storage.clone()) {
                continue;
            }
            merged.push((node.clone(), storage));
        }
    }
    merged
}

/// Attaches to each VM the disks whose vmid equals its own.
///
/// `disks` should already be deduplicated by volid; disk order is kept. Disks
/// without a vmid belong to no VM.
pub fn attach_disks(vms: &mut [ClusterVm], disks: Vec<StorageContent>) {
    let mut by_vmid: HashMap<VmId, Vec<StorageContent>> = HashMap::new();
    for disk in disks {
        if let Some(vmid) = disk.vmid {
            by_vmid.entry(vmid).or_default().push(disk);
        }
    }
    for vm in vms.iter_mut() {
        if let Some(bucket) = by_vmid.get(&vm.vmid()) {
            vm.disks = bucket.clone();
        }
    }
}

/// Pairs every HA group with the resources whose `group` names it.
pub fn attach_ha_resources(
    groups: Vec<HaGroup>,
    resources: Vec<HaResource>,
) -> Vec<ClusterHaGroup> {
    let mut by_group: HashMap<String, Vec<HaResource>> = HashMap::new();
    for resource in resources {
        if let Some(group) = resource.group.clone() {
            by_group.entry(group).or_default().push(resource);
        }
    }
    groups
        .into_iter()
        .map(|info| {
            let resources = by_group.get(&info.group).cloned().unwrap_or_default();
            ClusterHaGroup { info, resources }
        })
        .collect()
}
