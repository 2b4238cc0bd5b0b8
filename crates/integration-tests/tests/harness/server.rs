//! Test server wrapper that starts Vista on a random port

use std::net::SocketAddr;
use std::sync::Arc;

use vista_config::{Config, ProviderConfig};
use vista_server::Server;
use tokio_util::sync::CancellationToken;

/// A running test server instance
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
}

impl TestServer {
    /// Start a test server with the given configuration
    ///
    /// Binds to port 0 for automatic port assignment. Provider settings are
    /// fixed instead of being read from the process environment.
    pub async fn start((config, providers): (Config, ProviderConfig)) -> anyhow::Result<Self> {
        let server = Server::with_source(&config, Arc::new(providers));
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        // Bind the listener here so we know the actual port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, server.into_router())
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        let client = reqwest::Client::new();

        Ok(Self { addr, shutdown, client })
    }

    /// Base URL of the running test server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Get a reference to the HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// POST a guidance request and return the raw response
    pub async fn post_chat(&self, endpoint: &str, messages: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url(&format!("/api/{endpoint}")))
            .json(&serde_json::json!({ "messages": messages }))
            .send()
            .await
            .expect("request reaches the test server")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Payloads of the `data: ` lines of an event-stream body
pub fn parse_sse_data(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| line.starts_with("data: "))
        .map(|line| line.trim_start_matches("data: ").to_owned())
        .collect()
}

/// `type` field of each JSON event, with `[DONE]` kept as is
pub fn event_types(data: &[String]) -> Vec<String> {
    data.iter()
        .map(|payload| {
            if payload == "[DONE]" {
                return payload.clone();
            }
            let event: serde_json::Value = serde_json::from_str(payload).expect("event payload is JSON");
            event["type"].as_str().unwrap_or_default().to_owned()
        })
        .collect()
}
