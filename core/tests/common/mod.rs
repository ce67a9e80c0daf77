//! Shared rstest fixtures for the functional suites.
//!
//! The shared client targets `API_BASE_URL` when it is set, and otherwise a
//! fixture server started on an ephemeral local port, so the suites run
//! offline by default and against a live service on demand.

#![allow(dead_code)]

use api_client::config::{self, BASE_URL_VAR};
use api_client::{ApiClient, Settings};
use rstest::fixture;
use serde_json::Value;

/// Start the fixture server on a random port and return its base URL.
///
/// The server runs on its own thread with a current-thread runtime and lives
/// until the test process exits.
pub fn spawn_fixture_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// A client bound to its own fresh fixture server, never to a live service.
pub fn local_client() -> ApiClient {
    ApiClient::new(&spawn_fixture_server())
}

/// One client for every test in the binary. Never mutated after construction.
#[fixture]
#[once]
pub fn api_client_instance() -> ApiClient {
    match std::env::var(BASE_URL_VAR) {
        Ok(url) if !url.trim().is_empty() => ApiClient::from_settings(&Settings::from_env()),
        _ => local_client(),
    }
}

#[fixture]
pub fn base_url(api_client_instance: &ApiClient) -> String {
    api_client_instance.base_url().to_string()
}

#[fixture]
pub fn test_user_data() -> Value {
    config::test_user_data()
}

#[fixture]
pub fn test_post_data() -> Value {
    config::test_post_data()
}

#[fixture]
pub fn test_comment_data() -> Value {
    config::test_comment_data()
}

/// Teardown hook for resources a test creates. The fixture service never
/// persists writes, so there is nothing to remove yet.
pub struct Cleanup;

impl Drop for Cleanup {
    fn drop(&mut self) {
        tracing::debug!("cleanup hook ran");
    }
}

#[fixture]
pub fn cleanup_resources() -> Cleanup {
    Cleanup
}

/// Assert that `value` is an object carrying every name in `fields`.
pub fn assert_fields(value: &Value, fields: &[&str]) {
    let object = value
        .as_object()
        .unwrap_or_else(|| panic!("expected a JSON object, got {value}"));
    for field in fields {
        assert!(object.contains_key(*field), "required field '{field}' missing from {value}");
    }
}
