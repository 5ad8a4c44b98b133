#![allow(clippy::unwrap_used)]
// End-to-end tests for the write queue and state aggregation using wiremock.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use multimatic_api::{Credentials, RecordingClock, RequestExecutor, Transport};
use multimatic_core::{Client, CoreError, FailureKind, HeatingMode, QueueState};

// ── Helpers ─────────────────────────────────────────────────────────

const SERIAL: &str = "21223900";
const BATCH_WINDOW: Duration = Duration::from_millis(500);

async fn setup() -> (MockServer, Client, RecordingClock) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let clock = RecordingClock::new();
    let executor = RequestExecutor::new(
        Transport::with_client(reqwest::Client::new(), base_url),
        Credentials::new("user@example.com", SecretString::from("hunter2"), "phone-1"),
    )
    .with_clock(Arc::new(clock.clone()));
    let client = Client::from_executor(Arc::new(executor), BATCH_WINDOW);
    (server, client, clock)
}

fn zone_setpoint_path(zone: &str) -> String {
    format!("/facilities/{SERIAL}/systemcontrol/v1/zones/{zone}/heating/configuration/setpoint_temperature")
}

async fn mount_ok(server: &MockServer, http_method: &str, p: &str, body: Value) {
    Mock::given(method(http_method))
        .and(path(p))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "body": body })))
        .mount(server)
        .await;
}

async fn mount_failing_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/account/authentication/v1/token/new"))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
}

async fn puts(server: &MockServer) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "PUT")
        .collect()
}

fn json_body(req: &Request) -> Value {
    serde_json::from_slice(&req.body).unwrap()
}

// ── Write queue ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_target_temperature_sends_one_put() {
    let (server, client, _clock) = setup().await;

    Mock::given(method("PUT"))
        .and(path(zone_setpoint_path("Z1")))
        .and(body_json(json!({ "setpoint_temperature": 21.5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client.set_target_temperature(SERIAL, "Z1", 21.5);
    client.wait_idle().await;

    assert_eq!(puts(&server).await.len(), 1);
}

#[tokio::test]
async fn test_burst_to_same_target_sends_last_payload_only() {
    let (server, client, _clock) = setup().await;
    mount_ok(&server, "PUT", &zone_setpoint_path("Z1"), json!({})).await;

    client.set_target_temperature(SERIAL, "Z1", 20.0);
    client.set_target_temperature(SERIAL, "Z1", 21.0);
    client.set_target_temperature(SERIAL, "Z1", 21.5);
    client.wait_idle().await;

    let sent = puts(&server).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(json_body(&sent[0]), json!({ "setpoint_temperature": 21.5 }));
}

#[tokio::test]
async fn test_one_batching_window_per_idle_period() {
    let (server, client, clock) = setup().await;
    mount_ok(&server, "PUT", &zone_setpoint_path("Z1"), json!({})).await;
    mount_ok(&server, "PUT", &zone_setpoint_path("Z2"), json!({})).await;

    client.set_target_temperature(SERIAL, "Z1", 20.0);
    assert_eq!(client.queue().state(), QueueState::Scheduled);
    client.set_target_temperature(SERIAL, "Z2", 18.0);
    client.wait_idle().await;

    assert_eq!(clock.sleeps(), vec![BATCH_WINDOW]);
    assert_eq!(puts(&server).await.len(), 2);
    assert_eq!(client.queue().state(), QueueState::Idle);
}

#[tokio::test]
async fn test_coalesced_command_keeps_queue_position() {
    let (server, client, _clock) = setup().await;
    mount_ok(&server, "PUT", &zone_setpoint_path("Z1"), json!({})).await;
    mount_ok(&server, "PUT", &zone_setpoint_path("Z2"), json!({})).await;

    client.set_target_temperature(SERIAL, "Z1", 20.0);
    client.set_target_temperature(SERIAL, "Z2", 19.0);
    client.set_target_temperature(SERIAL, "Z1", 22.0);
    client.wait_idle().await;

    let sent = puts(&server).await;
    let order: Vec<_> = sent.iter().map(|r| r.url.path().to_owned()).collect();
    assert_eq!(order, vec![zone_setpoint_path("Z1"), zone_setpoint_path("Z2")]);
    assert_eq!(json_body(&sent[0]), json!({ "setpoint_temperature": 22.0 }));
}

#[tokio::test]
async fn test_commands_queued_mid_drain_run_in_same_drain() {
    let (server, client, clock) = setup().await;

    Mock::given(method("PUT"))
        .and(path(zone_setpoint_path("Z1")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    let mode_path =
        format!("/facilities/{SERIAL}/systemcontrol/v1/zones/Z2/heating/configuration/mode");
    mount_ok(&server, "PUT", &mode_path, json!({})).await;

    let mut states = client.queue().subscribe();
    client.set_target_temperature(SERIAL, "Z1", 21.0);
    states
        .wait_for(|s| *s == QueueState::Draining)
        .await
        .unwrap();

    client.set_heating_mode(SERIAL, "Z2", HeatingMode::Night);
    assert_eq!(client.queue().state(), QueueState::Draining);
    client.wait_idle().await;

    let sent = puts(&server).await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].url.path(), mode_path);
    assert_eq!(json_body(&sent[1]), json!({ "mode": "NIGHT" }));
    // No second batching window for the late arrival.
    assert_eq!(clock.sleeps(), vec![BATCH_WINDOW]);
}

#[tokio::test]
async fn test_failed_command_is_dropped_and_queue_moves_on() {
    let (server, client, _clock) = setup().await;
    mount_failing_login(&server).await;

    Mock::given(method("PUT"))
        .and(path(zone_setpoint_path("Z1")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_ok(&server, "PUT", &zone_setpoint_path("Z2"), json!({})).await;

    client.set_target_temperature(SERIAL, "Z1", 21.0);
    client.set_target_temperature(SERIAL, "Z2", 19.0);
    client.wait_idle().await;

    let sent = puts(&server).await;
    let z1 = sent
        .iter()
        .filter(|r| r.url.path() == zone_setpoint_path("Z1"))
        .count();
    let z2 = sent
        .iter()
        .filter(|r| r.url.path() == zone_setpoint_path("Z2"))
        .count();
    assert_eq!(z1, 3);
    assert_eq!(z2, 1);
    assert!(client.queue().pending().is_empty());
}

#[tokio::test]
async fn test_zone_timeprogram_write_goes_through_queue() {
    let (server, client, _clock) = setup().await;
    let program_path =
        format!("/facilities/{SERIAL}/systemcontrol/v1/zones/Z1/heating/timeprogram");
    mount_ok(&server, "PUT", &program_path, json!({})).await;

    let monday = json!({ "monday": [{ "startTime": "06:00", "setting": "DAY" }] });
    client.set_zone_timeprogram(SERIAL, "Z1", json!({ "monday": [] }));
    client.set_zone_timeprogram(SERIAL, "Z1", monday.clone());
    client.wait_idle().await;

    let sent = puts(&server).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].url.path(), program_path);
    assert_eq!(json_body(&sent[0]), monday);
}

#[test]
#[should_panic]
fn test_write_outside_runtime_panics() {
    let executor = RequestExecutor::new(
        Transport::with_client(reqwest::Client::new(), Url::parse("http://127.0.0.1:9").unwrap()),
        Credentials::new("user@example.com", SecretString::from("hunter2"), "phone-1"),
    );
    let client = Client::from_executor(Arc::new(executor), BATCH_WINDOW);

    client.set_target_temperature(SERIAL, "Z1", 21.0);
}

// ── State aggregation ───────────────────────────────────────────────

async fn mount_full_state(server: &MockServer, status_ok: bool) {
    mount_ok(
        server,
        "GET",
        &format!("/facilities/{SERIAL}/systemcontrol/v1/"),
        json!({
            "configuration": { "eco_mode": false },
            "zones": [
                { "_id": "Z1", "configuration": { "name": "Living" } },
                { "_id": "Z2", "configuration": { "name": "Bedroom" } }
            ],
            "dhw": [{ "_id": "D1", "hotwater": { "configuration": { "operation_mode": "AUTO" } } }]
        }),
    )
    .await;
    mount_ok(
        server,
        "GET",
        &format!("/facilities/{SERIAL}/livereport/v1"),
        json!({
            "devices": [{
                "_id": "D1",
                "reports": [
                    { "_id": "r1", "measurement_category": "TEMPERATURE", "value": 49.0 },
                    { "_id": "r2", "measurement_category": "HUMIDITY", "value": 41 }
                ]
            }]
        }),
    )
    .await;
    mount_ok(
        server,
        "GET",
        &format!("/facilities/{SERIAL}/public/v1/gatewayType"),
        json!({ "gatewayType": "VR920" }),
    )
    .await;

    let status_path = format!("/facilities/{SERIAL}/systemcontrol/v1/status");
    if status_ok {
        mount_ok(server, "GET", &status_path, json!({ "outside_temperature": 7.5 })).await;
    } else {
        Mock::given(method("GET"))
            .and(path(status_path))
            .respond_with(ResponseTemplate::new(500))
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_full_state_merges_and_indexes() {
    let (server, client, _clock) = setup().await;
    mount_full_state(&server, true).await;

    let snap = client.get_full_state(SERIAL).await.unwrap();

    let zone_ids: Vec<_> = snap.system.zones.keys().cloned().collect();
    assert_eq!(zone_ids, vec!["Z1", "Z2"]);
    assert_eq!(snap.zone("Z2").unwrap()["configuration"]["name"], "Bedroom");

    let config = snap.dhw_configuration("D1").unwrap();
    let report_ids: Vec<_> = config.keys().cloned().collect();
    assert_eq!(report_ids, vec!["r1"]);

    assert_eq!(snap.status["outside_temperature"], json!(7.5));
    assert_eq!(snap.gateway["gatewayType"], "VR920");
    assert_eq!(snap.system.other["configuration"]["eco_mode"], json!(false));
}

#[tokio::test]
async fn test_full_state_is_none_when_one_read_fails() {
    let (server, client, _clock) = setup().await;
    mount_full_state(&server, false).await;
    mount_failing_login(&server).await;

    assert!(client.get_full_state(SERIAL).await.is_none());

    let err = client.try_get_full_state(SERIAL).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Aggregation);
    match err {
        CoreError::Aggregation { failed, serial } => {
            assert_eq!(failed, vec!["status"]);
            assert_eq!(serial, SERIAL);
        }
        other => panic!("expected Aggregation error, got: {other:?}"),
    }
}
