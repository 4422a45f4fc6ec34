use crate::{FanOut, VmId, tests::create_authenticated_client};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

async fn mount_cluster(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api2/json/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"node": "pve1", "status": "online"},
                {"node": "pve2", "status": "online"}
            ]
        })))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/qemu"))
        .and(query_param("full", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "vmid": 100,
                    "name": "ubuntu-vm",
                    "status": "running",
                    "cpus": 4,
                    "cpu": 0.23,
                    "mem": 4294967296_i64,
                    "maxmem": 8589934592_i64,
                    "maxdisk": 42949672960_i64,
                    "uptime": 123456,
                    "qmpstatus": "running",
                    "tags": "ubuntu;production"
                }
            ]
        })))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve2/qemu"))
        .and(query_param("full", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "vmid": 101,
                    "name": "windows-vm",
                    "status": "stopped",
                    "cpus": 8,
                    "maxmem": 17179869184_i64,
                    "template": 0
                },
                {"vmid": 102, "status": "stopped"}
            ]
        })))
        .mount(mock_server)
        .await;

    // Both nodes see the shared `ceph` pool, each has its own `local-lvm`.
    for node in ["pve1", "pve2"] {
        Mock::given(method("GET"))
            .and(path(format!("/api2/json/nodes/{}/storage", node)))
            .and(query_param("content", "images"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"storage": "local-lvm", "type": "lvmthin", "content": "images,rootdir", "shared": 0},
                    {"storage": "ceph", "type": "rbd", "content": "images", "shared": 1}
                ]
            })))
            .mount(mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/api2/json/nodes/{}/storage/ceph/content", node)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"volid": "ceph:vm-100-disk-1", "size": 10737418240_i64, "vmid": "100", "format": "raw"},
                    {"volid": "ceph:vm-101-disk-0", "size": 53687091200_i64, "vmid": "101", "format": "raw"}
                ]
            })))
            .mount(mock_server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/storage/local-lvm/content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"volid": "local-lvm:vm-100-disk-0", "size": 34359738368_i64, "vmid": 100, "format": "raw"}
            ]
        })))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve2/storage/local-lvm/content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_get_vms_with_disks() {
    let mock_server = MockServer::start().await;
    let client = create_authenticated_client(&mock_server, FanOut::Sequential).await;
    mount_cluster(&mock_server).await;

    let vms = client.get_vms().await.unwrap();
    assert_eq!(vms.len(), 3);

    let vm100 = &vms[0];
    assert_eq!(vm100.vmid(), VmId::from(100));
    assert_eq!(vm100.node, "pve1");
    assert_eq!(vm100.info.name.as_deref(), Some("ubuntu-vm"));
    assert_eq!(vm100.info.cpus, Some(4));
    assert_eq!(vm100.info.maxmem, Some(8589934592));
    assert_eq!(vm100.info.tags.as_deref(), Some("ubuntu;production"));
    let volids: Vec<&str> = vm100.disks.iter().map(|d| d.volid.as_str()).collect();
    assert_eq!(volids, vec!["local-lvm:vm-100-disk-0", "ceph:vm-100-disk-1"]);

    let vm101 = &vms[1];
    assert_eq!(vm101.node, "pve2");
    assert_eq!(vm101.info.template, Some(false));
    // Listed by both nodes, attached once.
    assert_eq!(vm101.disks.len(), 1);
    assert_eq!(vm101.disks[0].volid, "ceph:vm-101-disk-0");

    let vm102 = &vms[2];
    assert_eq!(vm102.info.name, None);
    assert!(vm102.disks.is_empty());
}

#[tokio::test]
async fn test_get_vms_concurrent_same_result() {
    let mock_server = MockServer::start().await;
    mount_cluster(&mock_server).await;

    let sequential = create_authenticated_client(&mock_server, FanOut::Sequential).await;
    let concurrent = create_authenticated_client(&mock_server, FanOut::Concurrent).await;

    assert_eq!(
        sequential.get_vms().await.unwrap(),
        concurrent.get_vms().await.unwrap()
    );
}

#[tokio::test]
async fn test_get_vms_json_shape() {
    let mock_server = MockServer::start().await;
    let client = create_authenticated_client(&mock_server, FanOut::Sequential).await;
    mount_cluster(&mock_server).await;

    let vms = client.get_vms().await.unwrap();
    let json = serde_json::to_value(&vms).unwrap();

    assert_eq!(json[0]["vmid"], 100);
    assert_eq!(json[0]["node"], "pve1");
    assert_eq!(json[0]["disks"][1]["vmid"], 100);
    assert_eq!(json[2]["disks"], json!([]));
}
