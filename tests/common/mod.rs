//! Common test utilities shared across all integration test files.
//!
//! Usage in test files:
//! ```ignore
//! mod common;
//! use common::*;
//! ```

use livehint::{Client, Config, ProblemRef};
use std::time::Duration;
use wiremock::MockServer;

/// Bearer token every test client sends.
pub const TEST_TOKEN: &str = "test-token";

/// Header value the mock server expects on every request.
#[allow(dead_code)]
pub const EXPECTED_AUTH: &str = "Bearer test-token";

/// Creates a client pointed at the mock server.
pub fn client_for(server: &MockServer) -> Client {
    Client::new(config_for(server)).expect("client should build")
}

/// Creates a client pointed at the mock server with a client-wide timeout.
#[allow(dead_code)]
pub fn client_with_timeout(server: &MockServer, timeout: Duration) -> Client {
    Client::builder(config_for(server))
        .timeout(timeout)
        .build()
        .expect("client should build")
}

pub fn config_for(server: &MockServer) -> Config {
    Config::new(server.uri(), TEST_TOKEN).expect("mock server URI should be a valid base URL")
}

/// The problem used throughout the README example.
#[allow(dead_code)]
pub fn algebra_problem() -> ProblemRef {
    ProblemRef::new("mathbook_tx", "Algebra I", "M1", "101", "1")
}

/// Paths of the requests the server received, in arrival order.
#[allow(dead_code)]
pub async fn received_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| format!("{} {}", r.method, r.url.path()))
        .collect()
}
