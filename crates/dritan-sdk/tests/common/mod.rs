/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for dritan-sdk tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dritan_sdk::http::{HttpRequest, HttpResponse};
use dritan_sdk::ws::{SocketChannels, SocketCommand, SocketEvent, SocketRequest};
use dritan_sdk::{ClientConfig, DritanClient, HttpTransport, Result, SocketConnector};
use tokio::sync::mpsc;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-api-key";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client whose primary and control bases both point at the mock server
pub fn client_for(server: &MockServer) -> DritanClient {
    DritanClient::with_config_and_base_urls(
        ClientConfig::new(TEST_API_KEY),
        &server.uri(),
        &server.uri(),
    )
    .expect("client init")
}

/// Transport answering every request with one canned response and recording requests
#[derive(Debug)]
pub struct RecordingTransport {
    response: HttpResponse,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn new(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            response: HttpResponse::new(status, body),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        Ok(self.response.clone())
    }
}

/// Server side of a socket opened through `FakeConnector`
#[derive(Debug)]
pub struct FakeSocket {
    pub request: SocketRequest,
    pub events: mpsc::UnboundedSender<SocketEvent>,
    pub commands: mpsc::UnboundedReceiver<SocketCommand>,
}

/// Connector that hands every opened socket to the test
#[derive(Debug, Default)]
pub struct FakeConnector {
    opened: Mutex<Vec<FakeSocket>>,
}

impl FakeConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Take the most recently opened socket
    pub fn take_socket(&self) -> FakeSocket {
        self.opened
            .lock()
            .unwrap()
            .pop()
            .expect("no socket was opened")
    }
}

impl SocketConnector for FakeConnector {
    fn open(&self, request: SocketRequest) -> SocketChannels {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        self.opened.lock().unwrap().push(FakeSocket {
            request,
            events: event_tx,
            commands: command_rx,
        });
        SocketChannels {
            events: event_rx,
            commands: command_tx,
        }
    }
}

/// Client wired to fake HTTP and socket transports
pub fn fake_client(
    config: ClientConfig,
    transport: Arc<RecordingTransport>,
    connector: Arc<FakeConnector>,
) -> DritanClient {
    DritanClient::with_transports(config, transport, connector)
}
