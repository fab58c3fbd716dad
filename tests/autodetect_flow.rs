//! Autodetect tests against mock API servers.

use std::net::SocketAddr;

use rest_lab::autodetect::{AutodetectClient, AutodetectError};
use rest_lab::catalog::{BaseUrl, Catalog, HttpMethod, MethodSet, Protocol};
use rest_lab::config::AutodetectConfig;

mod common;

fn probe_config() -> AutodetectConfig {
    AutodetectConfig { timeout_secs: 2 }
}

fn catalog_against(port: u16) -> Catalog {
    let mut catalog = Catalog::new();
    catalog
        .add_project(
            "Probe Target",
            BaseUrl {
                protocol: Protocol::Http,
                host: "127.0.0.1".to_string(),
                port,
            },
        )
        .unwrap();
    catalog
}

#[tokio::test]
async fn test_autodetect_sets_exactly_the_allowed_methods() {
    let addr: SocketAddr = "127.0.0.1:28481".parse().unwrap();
    common::start_mock_api(addr, "200 OK", Some("GET, HEAD, OPTIONS")).await;

    let mut catalog = catalog_against(addr.port());
    let mut methods = MethodSet::default();
    methods.set(HttpMethod::Post, true);
    let created = catalog
        .add_endpoint("probe-target", "/users/[id]", methods)
        .unwrap()
        .created;

    let url = catalog
        .project("probe-target")
        .unwrap()
        .url
        .endpoint_url("/users/[id]");

    let client = AutodetectClient::new(&probe_config()).unwrap();
    let allowed = client.probe(&url).await.expect("probe should succeed");

    let endpoint = catalog
        .apply_detected_methods("probe-target", created, &allowed)
        .unwrap();

    assert!(endpoint.methods.is_enabled(HttpMethod::Get));
    assert!(endpoint.methods.is_enabled(HttpMethod::Head));
    assert!(endpoint.methods.is_enabled(HttpMethod::Options));
    assert!(!endpoint.methods.is_enabled(HttpMethod::Post));
    assert!(!endpoint.methods.is_enabled(HttpMethod::Put));
    assert!(!endpoint.methods.is_enabled(HttpMethod::Delete));
    assert!(!endpoint.methods.is_enabled(HttpMethod::Patch));
}

#[tokio::test]
async fn test_non_success_status_leaves_methods_unchanged() {
    let addr: SocketAddr = "127.0.0.1:28482".parse().unwrap();
    common::start_mock_api(addr, "500 Internal Server Error", Some("GET")).await;

    let mut catalog = catalog_against(addr.port());
    let mut methods = MethodSet::default();
    methods.set(HttpMethod::Post, true);
    catalog
        .add_endpoint("probe-target", "/health", methods)
        .unwrap();

    let url = catalog
        .project("probe-target")
        .unwrap()
        .url
        .endpoint_url("/health");

    let client = AutodetectClient::new(&probe_config()).unwrap();
    let err = client.probe(&url).await.unwrap_err();
    assert!(matches!(err, AutodetectError::Status(s) if s.as_u16() == 500));

    // The probe failed before any store write; flags are untouched.
    let endpoint = catalog
        .project("probe-target")
        .unwrap()
        .endpoint_by_key("/health")
        .unwrap();
    assert!(endpoint.methods.is_enabled(HttpMethod::Post));
    assert!(!endpoint.methods.is_enabled(HttpMethod::Get));
    assert!(endpoint.updated.is_none());
}

#[tokio::test]
async fn test_missing_allow_header_is_reported() {
    let addr: SocketAddr = "127.0.0.1:28483".parse().unwrap();
    common::start_mock_api(addr, "200 OK", None).await;

    let client = AutodetectClient::new(&probe_config()).unwrap();
    let err = client
        .probe(&format!("http://{}/users", addr))
        .await
        .unwrap_err();
    assert!(matches!(err, AutodetectError::MissingAllow));
}

#[tokio::test]
async fn test_probe_timeout_is_reported() {
    let addr: SocketAddr = "127.0.0.1:28484".parse().unwrap();
    common::start_unresponsive_api(addr).await;

    let client = AutodetectClient::new(&probe_config()).unwrap();
    let err = client
        .probe(&format!("http://{}/slow", addr))
        .await
        .unwrap_err();
    assert!(matches!(err, AutodetectError::Timeout(2)));
}

#[tokio::test]
async fn test_unreachable_host_is_a_request_error() {
    // Nothing listens here.
    let client = AutodetectClient::new(&probe_config()).unwrap();
    let err = client
        .probe("http://127.0.0.1:28489/nope")
        .await
        .unwrap_err();
    assert!(matches!(err, AutodetectError::Request(_)));
}
