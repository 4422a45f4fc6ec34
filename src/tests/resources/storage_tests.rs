use crate::{FanOut, tests::create_authenticated_client};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param_is_missing},
};

/// `pve1` and `pve2` each list their own `local` storage and the shared `nfs`.
async fn mount_two_node_storage(mock_server: &MockServer) {
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

    for (node, total) in [("pve1", 100), ("pve2", 200)] {
        Mock::given(method("GET"))
            .and(path(format!("/api2/json/nodes/{}/storage", node)))
            .and(query_param_is_missing("content"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {
                        "storage": "local",
                        "type": "dir",
                        "content": "iso,vztmpl,backup",
                        "shared": 0,
                        "total": total,
                        "used": 25,
                        "active": 1,
                        "enabled": 1
                    },
                    {
                        "storage": "nfs",
                        "type": "nfs",
                        "content": "images,rootdir",
                        "shared": 1,
                        "total": total,
                        "used": 50
                    }
                ]
            })))
            .mount(mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/api2/json/nodes/{}/storage/local/content", node)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {
                        "volid": format!("local:iso/{}.iso", node),
                        "size": 1024,
                        "format": "iso",
                        "content": "iso"
                    }
                ]
            })))
            .mount(mock_server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/storage/nfs/content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "volid": "nfs:100/vm-100-disk-0.qcow2",
                    "size": 34359738368_i64,
                    "vmid": "100",
                    "format": "qcow2",
                    "content": "images"
                }
            ]
        })))
        .expect(1)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_get_storages_counts_shared_once() {
    let mock_server = MockServer::start().await;
    let client = create_authenticated_client(&mock_server, FanOut::Sequential).await;
    mount_two_node_storage(&mock_server).await;

    let storages = client.get_storages().await.unwrap();

    let summary: Vec<(&str, Option<&str>)> =
        storages.iter().map(|s| (s.name(), s.node())).collect();
    assert_eq!(
        summary,
        vec![("local", Some("pve1")), ("nfs", None), ("local", Some("pve2"))]
    );

    // The shared record is the first node's copy.
    assert_eq!(storages[1].info.total, Some(100));
    assert!(storages[1].info.shared);
    assert_eq!(storages[1].contents[0].volid, "nfs:100/vm-100-disk-0.qcow2");

    assert_eq!(storages[0].contents[0].volid, "local:iso/pve1.iso");
    assert_eq!(storages[2].contents[0].volid, "local:iso/pve2.iso");
    assert_eq!(storages[2].info.usage(), Some(0.125));
    assert_eq!(storages[0].info.content_types(), vec!["iso", "vztmpl", "backup"]);
}

#[tokio::test]
async fn test_get_storages_concurrent_same_result() {
    let mock_server = MockServer::start().await;
    mount_two_node_storage(&mock_server).await;

    let client = create_authenticated_client(&mock_server, FanOut::Concurrent).await;
    let storages = client.get_storages().await.unwrap();

    let summary: Vec<(&str, Option<&str>)> =
        storages.iter().map(|s| (s.name(), s.node())).collect();
    assert_eq!(
        summary,
        vec![("local", Some("pve1")), ("nfs", None), ("local", Some("pve2"))]
    );
}

#[tokio::test]
async fn test_get_storages_json_shape() {
    let mock_server = MockServer::start().await;
    let client = create_authenticated_client(&mock_server, FanOut::Sequential).await;
    mount_two_node_storage(&mock_server).await;

    let storages = client.get_storages().await.unwrap();
    let json = serde_json::to_value(&storages).unwrap();

    assert_eq!(json[0]["node"], "pve1");
    assert_eq!(json[0]["shared"], 0);
    assert!(json[1].get("node").is_none());
    assert_eq!(json[1]["contents"][0]["vmid"], 100);
}
