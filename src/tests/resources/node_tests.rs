use crate::{FanOut, ProxmoxError, tests::create_authenticated_client};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

async fn mount_nodes(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api2/json/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "node": "pve1",
                    "status": "online",
                    "cpu": 0.15,
                    "maxcpu": 8,
                    "mem": 4294967296_i64,
                    "maxmem": 17179869184_i64,
                    "uptime": 86400,
                    "id": "node/pve1",
                    "ssl_fingerprint": "AA:BB:CC"
                },
                {
                    "node": "pve2",
                    "status": "offline"
                }
            ]
        })))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_get_nodes_success() {
    let mock_server = MockServer::start().await;
    let client = create_authenticated_client(&mock_server, FanOut::Sequential).await;
    mount_nodes(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/network"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "iface": "vmbr0",
                    "type": "bridge",
                    "cidr": "192.168.1.10/24",
                    "address": "192.168.1.10",
                    "gateway": "192.168.1.1",
                    "comments": "uplink",
                    "active": 1,
                    "autostart": 1
                },
                {"iface": "eno1", "type": "eth", "active": 1}
            ]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve2/network"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&mock_server)
        .await;
    for node in ["pve1", "pve2"] {
        Mock::given(method("GET"))
            .and(path(format!("/api2/json/nodes/{}/services", node)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"service": "pveproxy", "name": "pveproxy", "desc": "PVE API Proxy Server", "state": "running"},
                    {"service": "corosync", "state": "running"}
                ]
            })))
            .mount(&mock_server)
            .await;
    }

    let nodes = client.get_nodes().await.unwrap();
    assert_eq!(nodes.len(), 2);

    let pve1 = &nodes[0];
    assert_eq!(pve1.name(), "pve1");
    assert_eq!(pve1.info.maxcpu, Some(8));
    assert_eq!(pve1.memory_fraction(), Some(0.25));
    assert_eq!(pve1.network.len(), 2);
    assert_eq!(pve1.network[0].comments, "uplink");
    assert_eq!(pve1.network[0].cidr.as_deref(), Some("192.168.1.10/24"));
    assert_eq!(pve1.network[1].comments, "");
    assert_eq!(pve1.service_names(), vec!["pveproxy", "corosync"]);

    let pve2 = &nodes[1];
    assert_eq!(pve2.info.status, "offline");
    assert_eq!(pve2.info.cpu, None);
    assert!(pve2.network.is_empty());
    assert_eq!(pve2.memory_fraction(), None);
}

#[tokio::test]
async fn test_get_nodes_fails_on_unreachable_node() {
    let mock_server = MockServer::start().await;
    let client = create_authenticated_client(&mock_server, FanOut::Concurrent).await;
    mount_nodes(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/network"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve2/network"))
        .respond_with(ResponseTemplate::new(595).set_body_string("no route to host"))
        .mount(&mock_server)
        .await;

    let result = client.get_nodes().await;
    assert!(matches!(result, Err(ProxmoxError::Api { status: 595, .. })));
}

#[tokio::test]
async fn test_get_nodes_empty_cluster() {
    let mock_server = MockServer::start().await;
    let client = create_authenticated_client(&mock_server, FanOut::Sequential).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&mock_server)
        .await;

    assert!(client.get_nodes().await.unwrap().is_empty());
}
