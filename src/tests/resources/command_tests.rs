use crate::{
    CreateVmParams, DeleteVmOptions, FanOut, FstrimResult, HaAddOptions, HaGroupParams, HaState,
    ProxmoxError, StartVmOptions, StopVmOptions, VmId,
    tests::{client_with_raw_answer, create_authenticated_client},
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path, query_param},
};

fn upid(kind: &str, vmid: u32) -> String {
    format!("UPID:pve1:0001A2B3:004C4B40:6700A1B2:{}:{}:root@pam:", kind, vmid)
}

#[tokio::test]
async fn test_create_vm() {
    let mock_server = MockServer::start().await;
    let client = create_authenticated_client(&mock_server, FanOut::Sequential).await;

    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve1/qemu"))
        .and(body_json(json!({
            "vmid": 200,
            "name": "web01",
            "memory": 2048,
            "cores": 2,
            "net0": "virtio,bridge=vmbr0",
            "agent": 1,
            "scsi0": "local-lvm:32"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": upid("qmcreate", 200)})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut params = CreateVmParams::new(VmId::from(200));
    params.name = Some("web01".to_string());
    params.memory = Some(2048);
    params.cores = Some(2);
    params.net0 = Some("virtio,bridge=vmbr0".to_string());
    params.agent = Some(true);
    params
        .extra
        .insert("scsi0".to_string(), json!("local-lvm:32"));

    let task = client.create_vm("pve1", &params).await.unwrap();
    assert_eq!(task, upid("qmcreate", 200));
}

#[tokio::test]
async fn test_delete_vm_sends_options_as_query() {
    let mock_server = MockServer::start().await;
    let client = create_authenticated_client(&mock_server, FanOut::Sequential).await;

    Mock::given(method("DELETE"))
        .and(path("/api2/json/nodes/pve1/qemu/200"))
        .and(query_param("purge", "1"))
        .and(query_param("destroy-unreferenced-disks", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": upid("qmdestroy", 200)})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = DeleteVmOptions {
        destroy_unreferenced_disks: Some(true),
        ..DeleteVmOptions::purge()
    };
    let task = client
        .delete_vm("pve1", VmId::from(200), &options)
        .await
        .unwrap();
    assert_eq!(task, upid("qmdestroy", 200));
}

#[tokio::test]
async fn test_start_and_stop_vm() {
    let mock_server = MockServer::start().await;
    let client = create_authenticated_client(&mock_server, FanOut::Sequential).await;

    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve1/qemu/100/status/start"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": upid("qmstart", 100)})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve1/qemu/100/status/stop"))
        .and(body_json(json!({"timeout": 60, "overrule-shutdown": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": upid("qmstop", 100)})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let started = client
        .start_vm("pve1", VmId::from(100), &StartVmOptions::default())
        .await
        .unwrap();
    assert_eq!(started, upid("qmstart", 100));

    let stop = StopVmOptions {
        timeout: Some(60),
        overrule_shutdown: Some(true),
        ..Default::default()
    };
    let stopped = client
        .stop_vm("pve1", VmId::from(100), &stop)
        .await
        .unwrap();
    assert_eq!(stopped, upid("qmstop", 100));
}

#[tokio::test]
async fn test_start_vm_error_propagates() {
    let mock_server = MockServer::start().await;
    let client = create_authenticated_client(&mock_server, FanOut::Sequential).await;

    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve1/qemu/404/status/start"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string("Configuration file 'nodes/pve1/qemu-server/404.conf' does not exist"),
        )
        .mount(&mock_server)
        .await;

    let result = client
        .start_vm("pve1", VmId::from(404), &StartVmOptions::default())
        .await;
    assert!(matches!(result, Err(ProxmoxError::Api { status: 500, .. })));
}

#[tokio::test]
async fn test_invalid_vmid_sends_nothing() {
    let mock_server = MockServer::start().await;
    let client = create_authenticated_client(&mock_server, FanOut::Sequential).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = client
        .start_vm("pve1", VmId::from(42), &StartVmOptions::default())
        .await;
    assert!(matches!(result, Err(ProxmoxError::Validation(_))));
}

#[tokio::test]
async fn test_ha_add_and_remove_vm() {
    let mock_server = MockServer::start().await;
    let client = create_authenticated_client(&mock_server, FanOut::Sequential).await;

    Mock::given(method("POST"))
        .and(path("/api2/json/cluster/ha/resources"))
        .and(body_json(json!({
            "sid": "vm:100",
            "group": "prod",
            "state": "started",
            "max_relocate": 2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api2/json/cluster/ha/resources/vm:100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = HaAddOptions {
        group: Some("prod".to_string()),
        state: Some(HaState::Started),
        max_relocate: Some(2),
        ..Default::default()
    };
    client.ha_add_vm(VmId::from(100), &options).await.unwrap();
    client.ha_remove_vm(VmId::from(100)).await.unwrap();
}

#[tokio::test]
async fn test_ha_group_create_and_delete() {
    let mock_server = MockServer::start().await;
    let client = create_authenticated_client(&mock_server, FanOut::Sequential).await;

    Mock::given(method("POST"))
        .and(path("/api2/json/cluster/ha/groups"))
        .and(body_json(json!({"group": "prod", "nodes": "pve1:2,pve2", "restricted": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api2/json/cluster/ha/groups/prod"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let params = HaGroupParams {
        group: "prod".to_string(),
        nodes: "pve1:2,pve2".to_string(),
        comment: None,
        restricted: Some(true),
        nofailback: None,
    };
    client.create_ha_group(&params).await.unwrap();
    client.delete_ha_group("prod").await.unwrap();
}

#[tokio::test]
async fn test_fstrim_vm_success() {
    let mock_server = MockServer::start().await;
    let client = create_authenticated_client(&mock_server, FanOut::Sequential).await;

    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve1/qemu/100/agent/fstrim"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"result": {"paths": [{"path": "/", "trimmed": 1073741824_i64}]}}
        })))
        .mount(&mock_server)
        .await;

    let result = client.fstrim_vm("pve1", VmId::from(100)).await;
    assert_eq!(
        result,
        FstrimResult::Completed(json!({"result": {"paths": [{"path": "/", "trimmed": 1073741824_i64}]}}))
    );
}

#[tokio::test]
async fn test_fstrim_vm_agent_down() {
    let client =
        client_with_raw_answer("500 QEMU guest agent is not running", r#"{"data":null}"#).await;

    let result = client.fstrim_vm("pve1", VmId::from(100)).await;
    assert_eq!(
        result.error(),
        Some("API error (500): QEMU guest agent is not running")
    );
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"error": "API error (500): QEMU guest agent is not running"})
    );
}

#[tokio::test]
async fn test_api_error_keeps_reason_phrase() {
    let client = client_with_raw_answer("500 VM 100 not running", r#"{"data":null}"#).await;

    let result = client
        .stop_vm("pve1", VmId::from(100), &StopVmOptions::default())
        .await;
    match result {
        Err(ProxmoxError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "VM 100 not running");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_ping_agent() {
    let mock_server = MockServer::start().await;
    let client = create_authenticated_client(&mock_server, FanOut::Sequential).await;

    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve1/qemu/100/agent/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"result": {}}})))
        .mount(&mock_server)
        .await;

    let answer = client.ping_agent("pve1", VmId::from(100)).await.unwrap();
    assert_eq!(answer, json!({"result": {}}));
}
