//! Shared test helpers for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use justspace_api::router::build_router;
use justspace_api::state::AppState;
use justspace_auth::{JwtDecoder, JwtEncoder};
use justspace_core::config::AppConfig;
use justspace_realtime::{Hub, WsAuthenticator};

/// JWT secret shared by the test app and the token helpers.
pub const TEST_SECRET: &str = "integration-test-secret";

/// Test application context
pub struct TestApp {
    /// The Axum router for plain HTTP test requests
    pub router: Router,
    /// Address of the live listener (for WebSocket clients)
    pub addr: SocketAddr,
    /// Hub handle for publishing and registry inspection
    pub hub: Hub,
    /// Token encoder sharing the app's secret
    pub encoder: JwtEncoder,
}

impl TestApp {
    /// Start a test application on an ephemeral port.
    pub async fn spawn() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = TEST_SECRET.to_string();
        let config = Arc::new(config);

        let hub = Hub::new(&config.realtime);
        let decoder = Arc::new(JwtDecoder::new(&config.auth));
        let authenticator = WsAuthenticator::new(decoder);
        let encoder = JwtEncoder::new(&config.auth);

        let state = AppState {
            config: Arc::clone(&config),
            hub: hub.clone(),
            authenticator,
        };
        let router = build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");

        let serve_router = router.clone();
        tokio::spawn(async move {
            axum::serve(listener, serve_router)
                .await
                .expect("test server");
        });

        Self {
            router,
            addr,
            hub,
            encoder,
        }
    }

    /// WebSocket URL for the given raw query string (may be empty).
    pub fn ws_url(&self, query: &str) -> String {
        format!("ws://{}/api/ws{}", self.addr, query)
    }

    /// Issue a valid token for `user_id` with the app's secret.
    pub fn token_for(&self, user_id: &str) -> String {
        self.encoder.issue(user_id).expect("issue token")
    }

    /// Make a plain HTTP request against the router.
    pub async fn request(&self, method: &str, path: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("send request");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, body)
    }

    /// Wait until the hub reports `expected` registered connections.
    ///
    /// Registration happens on the server side after the upgrade
    /// completes, so clients poll instead of assuming it is immediate.
    pub async fn wait_for_connections(&self, expected: usize) {
        for _ in 0..100 {
            if self.hub.connection_count().await == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "hub never reached {expected} connections (currently {})",
            self.hub.connection_count().await
        );
    }
}

/// Craft a token that expired an hour ago, signed with the app's secret.
pub fn expired_token(user_id: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = serde_json::json!({
        "sub": user_id,
        "iat": now - 7200,
        "exp": now - 3600,
    });
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("encode expired token")
}
