//! Rendering of the cluster views for the terminal.

use pve_cluster::{ClusterHaGroup, ClusterNode, ClusterStorage, ClusterVm};
use serde::Serialize;
use std::fmt::{Debug, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Rust `Debug` form.
    Raw,
    Json,
    /// Indented, human-readable listing.
    Text,
}

/// Renders `items` in `mode`, using `text` for [`OutputMode::Text`].
pub fn render<T>(items: &[T], mode: OutputMode, text: fn(&[T]) -> String) -> anyhow::Result<String>
where
    T: Serialize + Debug,
{
    Ok(match mode {
        OutputMode::Raw => format!("{:?}", items),
        OutputMode::Json => serde_json::to_string(items)?,
        OutputMode::Text => text(items),
    })
}

fn percent(fraction: Option<f64>) -> String {
    match fraction {
        Some(f) => format!("{:.1}%", f * 100.0),
        None => "n/a".to_string(),
    }
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

pub fn vms_text(vms: &[ClusterVm]) -> String {
    let mut out = String::new();
    for vm in vms {
        let _ = writeln!(out, "{}:", vm.vmid());
        let _ = writeln!(out, "    name: {}", vm.info.name.as_deref().unwrap_or(""));
        let _ = writeln!(out, "    node: {}", vm.node);
        let _ = writeln!(out, "    status: {}", vm.info.status);
        let _ = writeln!(out, "    cpu: {}", or_na(vm.info.cpus));
        let _ = writeln!(out, "    memory: {}", or_na(vm.info.maxmem));
        let _ = writeln!(out, "    disks:");
        for disk in &vm.disks {
            let _ = writeln!(out, "        {}:", disk.volid);
            let _ = writeln!(out, "            size: {}", disk.size);
        }
    }
    out
}

pub fn nodes_text(nodes: &[ClusterNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        let _ = writeln!(out, "{}:", node.name());
        let _ = writeln!(out, "    status: {}", node.info.status);
        let _ = writeln!(out, "    cpu: {}", percent(node.info.cpu));
        let _ = writeln!(out, "    memory: {}", percent(node.memory_fraction()));
        for net in &node.network {
            let _ = writeln!(out, "        {}:", net.iface);
            let _ = writeln!(out, "            comments: {}", net.comments.trim_end());
            if let Some(cidr) = &net.cidr {
                let _ = writeln!(out, "            ip: {}", cidr);
            }
        }
    }
    out
}

pub fn storages_text(storages: &[ClusterStorage]) -> String {
    let mut out = String::new();
    for storage in storages {
        let _ = writeln!(out, "{}:", storage.name());
        if let Some(node) = storage.node() {
            let _ = writeln!(out, "    node: {}", node);
        }
        let _ = writeln!(out, "    type: {}", storage.info.storage_type);
        let _ = writeln!(out, "    content: {}", storage.info.content);
        let _ = writeln!(out, "    shared: {}", u8::from(storage.info.shared));
        let _ = writeln!(out, "    size: {}", or_na(storage.info.total));
        let _ = writeln!(out, "    used: {}", percent(storage.info.usage()));
    }
    out
}

pub fn ha_groups_text(groups: &[ClusterHaGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "{}:", group.info.group);
        let _ = writeln!(out, "    comment: {}", group.info.comment);
        let _ = writeln!(out, "    nodes: {}", group.info.nodes);
        let _ = writeln!(out, "    resources:");
        for resource in &group.resources {
            let _ = writeln!(out, "        {}:", resource.sid);
            let _ = writeln!(out, "            type: {}", resource.resource_type);
            let _ = writeln!(out, "            state: {}", resource.state);
        }
    }
    out
}
