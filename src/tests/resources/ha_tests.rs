use crate::{FanOut, ProxmoxError, tests::create_authenticated_client};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

async fn mount_ha(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api2/json/cluster/ha/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "group": "prod",
                    "type": "group",
                    "nodes": "pve1:2,pve2:1",
                    "restricted": 1,
                    "nofailback": 0,
                    "comment": "production"
                },
                {"group": "lab", "type": "group", "nodes": "pve3"}
            ]
        })))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api2/json/cluster/ha/resources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"sid": "vm:100", "type": "vm", "state": "started", "group": "prod", "max_restart": 1},
                {"sid": "vm:101", "type": "vm", "state": "stopped"},
                {"sid": "ct:200", "type": "ct", "state": "started", "group": "prod"}
            ]
        })))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_get_ha_groups() {
    let mock_server = MockServer::start().await;
    let client = create_authenticated_client(&mock_server, FanOut::Sequential).await;
    mount_ha(&mock_server).await;

    let groups = client.get_ha_groups().await.unwrap();
    assert_eq!(groups.len(), 2);

    let prod = &groups[0];
    assert_eq!(prod.info.node_names(), vec!["pve1", "pve2"]);
    assert_eq!(prod.info.restricted, Some(true));
    assert_eq!(prod.info.nofailback, Some(false));
    let sids: Vec<&str> = prod.resources.iter().map(|r| r.sid.as_str()).collect();
    assert_eq!(sids, vec!["vm:100", "ct:200"]);
    assert_eq!(prod.resources[0].max_restart, Some(1));

    let lab = &groups[1];
    assert_eq!(lab.info.comment, "");
    assert!(lab.resources.is_empty());
}

#[tokio::test]
async fn test_get_ha_groups_concurrent() {
    let mock_server = MockServer::start().await;
    let client = create_authenticated_client(&mock_server, FanOut::Concurrent).await;
    mount_ha(&mock_server).await;

    let groups = client.get_ha_groups().await.unwrap();
    assert_eq!(groups[0].resources.len(), 2);
}

#[tokio::test]
async fn test_get_ha_groups_failure() {
    let mock_server = MockServer::start().await;
    let client = create_authenticated_client(&mock_server, FanOut::Sequential).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/cluster/ha/groups"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Permission check failed"))
        .mount(&mock_server)
        .await;

    let result = client.get_ha_groups().await;
    assert!(matches!(result, Err(ProxmoxError::Api { status: 403, .. })));
}
