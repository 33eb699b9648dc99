//! Test helpers for integration tests
//!
//! Spawns an in-process server and wraps the HTTP and WebSocket clients.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use resq_api::{create_app, create_app_state};
use resq_common::AppConfig;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

/// Counter for unique test ports
static PORT_COUNTER: AtomicU16 = AtomicU16::new(19400);

/// Get a unique port for testing
pub fn get_test_port() -> u16 {
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub config: AppConfig,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        let config = test_config()?;
        Self::start_with_config(config).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let addr = SocketAddr::from(([127, 0, 0, 1], get_test_port()));

        let state = create_app_state(config.clone()).await?;
        let app = create_app(state);

        let listener = TcpListener::bind(addr).await?;
        let actual_addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        tokio::time::sleep(Duration::from_millis(100)).await;

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr: actual_addr,
            client,
            config,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn feed_url(&self) -> String {
        format!("ws://{}/api/v1/feed", self.addr)
    }

    /// GET without credentials
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// GET with a bearer token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).bearer_auth(token).send().await?)
    }

    /// POST a JSON body without credentials
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// POST a JSON body with a bearer token
    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// POST with a bearer token and no body
    pub async fn post_empty_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).bearer_auth(token).send().await?)
    }

    /// Open the live feed socket and read the `hello` frame
    pub async fn open_feed(&self) -> Result<FeedClient> {
        let (socket, _) = connect_async(self.feed_url()).await?;
        let mut client = FeedClient { socket };
        let hello = client.next_frame().await?;
        anyhow::ensure!(hello["op"] == "hello", "expected hello, got {hello}");
        Ok(client)
    }
}

/// Client side of one live feed socket
pub struct FeedClient {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

/// What the server did next
#[derive(Debug)]
pub enum FeedEvent {
    Frame(Value),
    Closed(Option<u16>),
}

impl FeedClient {
    pub async fn send(&mut self, frame: &Value) -> Result<()> {
        self.socket.send(Message::Text(frame.to_string())).await?;
        Ok(())
    }

    pub async fn identify(&mut self, token: &str) -> Result<()> {
        self.send(&serde_json::json!({"op": "identify", "d": {"token": token}}))
            .await
    }

    /// Next frame or close, within five seconds
    pub async fn next_event(&mut self) -> Result<FeedEvent> {
        loop {
            let message = tokio::time::timeout(Duration::from_secs(5), self.socket.next())
                .await
                .context("timed out waiting for the live feed")?;

            match message {
                None => return Ok(FeedEvent::Closed(None)),
                Some(Err(e)) => return Err(e.into()),
                Some(Ok(Message::Text(text))) => {
                    return Ok(FeedEvent::Frame(serde_json::from_str(&text)?))
                }
                Some(Ok(Message::Close(frame))) => {
                    return Ok(FeedEvent::Closed(frame.map(|f| u16::from(f.code))))
                }
                Some(Ok(_)) => continue,
            }
        }
    }

    pub async fn next_frame(&mut self) -> Result<Value> {
        match self.next_event().await? {
            FeedEvent::Frame(frame) => Ok(frame),
            FeedEvent::Closed(code) => anyhow::bail!("feed closed with {code:?}"),
        }
    }

    /// Skip frames until one with `op`
    pub async fn wait_for(&mut self, op: &str) -> Result<Value> {
        loop {
            let frame = self.next_frame().await?;
            if frame["op"] == op {
                return Ok(frame);
            }
        }
    }

    /// Read until the server closes, returning its close code
    pub async fn wait_for_close(&mut self) -> Result<Option<u16>> {
        loop {
            if let FeedEvent::Closed(code) = self.next_event().await? {
                return Ok(code);
            }
        }
    }
}

/// Configuration from the environment
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();
    AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Whether PostgreSQL and Redis are configured
pub async fn check_test_env() -> bool {
    dotenvy::dotenv().ok();

    for var in ["DATABASE_URL", "REDIS_URL", "JWT_SECRET", "API_PORT"] {
        if std::env::var(var).is_err() {
            eprintln!("Skipping test: {var} not set");
            return false;
        }
    }

    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error response and return its `error` object
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<Value> {
    let body: Value = assert_json(response, expected_status).await?;
    Ok(body["error"].clone())
}
