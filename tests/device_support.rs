//! Integration tests driving the public client API over real HTTP
//!
//! Uses a mockito server as the device list endpoint so the whole path
//! (configuration, cache, reqwest transport, lookup) is exercised the way an
//! embedder would use it.

use lineageos_api::{Client, ClientError, ClientOptions, ConfigError};

const DEVICES_BODY: &str = r#"[
    { "model": "guacamoleb", "oem": "OnePlus", "name": "7", "lineage_recovery": true },
    { "model": "cheeseburger", "oem": "OnePlus", "name": "5" }
]"#;

fn options_for(server: &mockito::ServerGuard) -> ClientOptions {
    ClientOptions::new().with_device_list_url(format!("{}/devices.json", server.url()))
}

#[tokio::test]
async fn supported_device_is_found_over_http() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/devices.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(DEVICES_BODY)
        .create_async()
        .await;

    let client = Client::new(options_for(&server)).expect("options are valid");
    let device = client
        .is_device_supported("guacamoleb")
        .await
        .expect("device is supported");

    assert_eq!(device.oem, "OnePlus");
    assert_eq!(device.name, "7");
    assert_eq!(device.lineage_recovery, Some(true));
    mock.assert_async().await;
}

#[tokio::test]
async fn second_lookup_within_ttl_does_not_hit_the_server() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/devices.json")
        .with_status(200)
        .with_body(DEVICES_BODY)
        .expect(1)
        .create_async()
        .await;

    let client = Client::new(options_for(&server)).expect("options are valid");

    client
        .is_device_supported("guacamoleb")
        .await
        .expect("first lookup");
    client
        .is_device_supported("cheeseburger")
        .await
        .expect("second lookup from cache");

    // Exactly one request despite two lookups
    mock.assert_async().await;
}

#[tokio::test]
async fn zero_ttl_refetches_on_every_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/devices.json")
        .with_status(200)
        .with_body(DEVICES_BODY)
        .expect(2)
        .create_async()
        .await;

    let options = options_for(&server).with_cache_time(0);
    let client = Client::new(options).expect("options are valid");

    client.get_device_list().await.expect("first fetch");
    client.get_device_list().await.expect("second fetch");

    mock.assert_async().await;
}

#[tokio::test]
async fn unknown_codename_fails_with_device_not_supported() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/devices.json")
        .with_status(200)
        .with_body(DEVICES_BODY)
        .create_async()
        .await;

    let client = Client::new(options_for(&server)).expect("options are valid");
    let err = client.is_device_supported("flounder").await.unwrap_err();

    match err {
        ClientError::DeviceNotSupported(codename) => assert_eq!(codename, "flounder"),
        other => panic!("expected DeviceNotSupported, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_surfaces_as_a_source_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/devices.json")
        .with_status(500)
        .create_async()
        .await;

    let client = Client::new(options_for(&server)).expect("options are valid");
    let err = client.is_device_supported("guacamoleb").await.unwrap_err();

    assert!(matches!(err, ClientError::Source(_)));
}

#[tokio::test]
async fn failed_fetch_is_retried_on_the_next_call() {
    let mut server = mockito::Server::new_async().await;
    let failure = server
        .mock("GET", "/devices.json")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let client = Client::new(options_for(&server)).expect("options are valid");
    assert!(client.get_device_list().await.is_err());
    failure.assert_async().await;

    // The failure cached nothing; a later call reaches the recovered server
    failure.remove_async().await;
    let recovery = server
        .mock("GET", "/devices.json")
        .with_status(200)
        .with_body(DEVICES_BODY)
        .expect(1)
        .create_async()
        .await;

    let devices = client.get_device_list().await.expect("server recovered");
    assert_eq!(devices.len(), 2);
    recovery.assert_async().await;
}

#[test]
fn insecure_host_requires_the_override() {
    let err = Client::new(ClientOptions::new().with_host("http://insecure.example/")).unwrap_err();
    assert!(matches!(err, ConfigError::InsecureHost(_)));

    let client = Client::new(
        ClientOptions::new()
            .with_host("http://insecure.example")
            .with_allow_insecure(true),
    )
    .expect("override permits http");
    assert_eq!(client.host(), "http://insecure.example/");
}

#[test]
fn invalid_host_is_rejected_at_construction() {
    let err = Client::new(ClientOptions::new().with_host("definitely not a url")).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidHost(_)));
}
