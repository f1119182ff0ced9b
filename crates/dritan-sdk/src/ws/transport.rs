/*
[INPUT]:  Stream URL, handshake headers and outbound socket commands
[OUTPUT]: Socket lifecycle events (open, frames, errors, close) over channels
[POS]:    WebSocket layer - injectable socket transport
[UPDATE]: When changing handshake, framing or close behavior
*/

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tracing::{debug, warn};
use url::Url;

use crate::http::{DritanError, Result};

/// How long a locally initiated close waits for the server's close frame
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Where a stream carries the API key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialPlacement {
    /// `?apiKey=` on the stream URL; for runtimes whose sockets cannot set headers
    Query,
    /// `x-api-key` handshake header
    Header,
}

impl CredentialPlacement {
    /// `Query` on wasm32 (browser sockets cannot set headers), `Header` elsewhere
    pub fn runtime_default() -> Self {
        if cfg!(target_arch = "wasm32") {
            CredentialPlacement::Query
        } else {
            CredentialPlacement::Header
        }
    }
}

impl fmt::Display for CredentialPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialPlacement::Query => f.write_str("query"),
            CredentialPlacement::Header => f.write_str("header"),
        }
    }
}

impl FromStr for CredentialPlacement {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "query" => Ok(CredentialPlacement::Query),
            "header" => Ok(CredentialPlacement::Header),
            other => Err(format!("unknown credential placement: {other}")),
        }
    }
}

/// Handshake parameters for one socket
#[derive(Clone, PartialEq, Eq)]
pub struct SocketRequest {
    pub url: Url,
    pub headers: Vec<(String, String)>,
}

impl fmt::Debug for SocketRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // both may carry the API key
        f.debug_struct("SocketRequest")
            .field("host", &self.url.host_str())
            .field("path", &self.url.path())
            .field("headers", &self.headers.len())
            .finish()
    }
}

/// Inbound data frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketFrame {
    Text(String),
    Binary(Vec<u8>),
    /// Any other frame kind, passed through raw
    Other(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseInfo {
    pub code: u16,
    pub reason: String,
}

impl From<CloseFrame> for CloseInfo {
    fn from(frame: CloseFrame) -> Self {
        Self {
            code: u16::from(frame.code),
            reason: frame.reason.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    Open,
    Frame(SocketFrame),
    Error(String),
    /// Always the last event of a socket
    Close(Option<CloseInfo>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketCommand {
    Text(String),
    Close,
}

/// Caller-side ends of an opened socket
#[derive(Debug)]
pub struct SocketChannels {
    pub events: mpsc::UnboundedReceiver<SocketEvent>,
    pub commands: mpsc::UnboundedSender<SocketCommand>,
}

/// Opens sockets; the default implementation is `TungsteniteConnector`.
///
/// `open` returns immediately. The connection outcome arrives as `SocketEvent::Open`
/// or `SocketEvent::Error` followed by `SocketEvent::Close`. Dropping the command
/// sender closes the socket.
pub trait SocketConnector: Send + Sync + fmt::Debug {
    fn open(&self, request: SocketRequest) -> SocketChannels;
}

/// tokio-tungstenite backed connector
#[derive(Debug, Clone, Default)]
pub struct TungsteniteConnector;

impl TungsteniteConnector {
    pub fn new() -> Self {
        Self
    }
}

impl SocketConnector for TungsteniteConnector {
    fn open(&self, request: SocketRequest) -> SocketChannels {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_socket(request, event_tx, command_rx));
        SocketChannels {
            events: event_rx,
            commands: command_tx,
        }
    }
}

fn build_handshake(
    request: &SocketRequest,
) -> Result<tokio_tungstenite::tungstenite::handshake::client::Request> {
    let mut handshake = request
        .url
        .as_str()
        .into_client_request()
        .map_err(|err| DritanError::WebSocket(err.to_string()))?;

    for (name, value) in &request.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| DritanError::WebSocket(err.to_string()))?;
        let value =
            HeaderValue::from_str(value).map_err(|err| DritanError::WebSocket(err.to_string()))?;
        handshake.headers_mut().insert(name, value);
    }
    Ok(handshake)
}

async fn run_socket(
    request: SocketRequest,
    events: mpsc::UnboundedSender<SocketEvent>,
    mut commands: mpsc::UnboundedReceiver<SocketCommand>,
) {
    let path = request.url.path().to_string();

    let handshake = match build_handshake(&request) {
        Ok(handshake) => handshake,
        Err(err) => {
            let _ = events.send(SocketEvent::Error(err.to_string()));
            let _ = events.send(SocketEvent::Close(None));
            return;
        }
    };

    let connect = connect_async(handshake);
    tokio::pin!(connect);
    let ws_stream = loop {
        tokio::select! {
            result = &mut connect => match result {
                Ok((ws_stream, _response)) => break ws_stream,
                Err(err) => {
                    warn!(stream = %path, error = %err, "ws connect failed");
                    let _ = events.send(SocketEvent::Error(err.to_string()));
                    let _ = events.send(SocketEvent::Close(None));
                    return;
                }
            },
            command = commands.recv() => match command {
                Some(SocketCommand::Text(_)) => {
                    debug!(stream = %path, "dropping outbound text before open");
                }
                Some(SocketCommand::Close) | None => {
                    debug!(stream = %path, "ws closed before open");
                    let _ = events.send(SocketEvent::Close(None));
                    return;
                }
            },
        }
    };

    debug!(stream = %path, "ws connected");
    let _ = events.send(SocketEvent::Open);

    let (mut write, mut read) = ws_stream.split();
    let mut close_info = None;
    let mut closing = false;

    loop {
        tokio::select! {
            command = commands.recv() => {
                match command {
                    Some(SocketCommand::Text(text)) => {
                        if let Err(err) = write.send(WsMessage::Text(text.into())).await {
                            let _ = events.send(SocketEvent::Error(err.to_string()));
                            break;
                        }
                    }
                    Some(SocketCommand::Close) | None => {
                        closing = true;
                        let _ = write.send(WsMessage::Close(None)).await;
                        break;
                    }
                }
            }
            incoming = read.next() => {
                match incoming {
                    Some(Ok(WsMessage::Close(frame))) => {
                        close_info = frame.map(CloseInfo::from);
                        let _ = write.send(WsMessage::Close(None)).await;
                        break;
                    }
                    Some(Ok(WsMessage::Ping(_))) | Some(Ok(WsMessage::Pong(_))) => {}
                    Some(Ok(WsMessage::Text(text))) => {
                        let _ = events.send(SocketEvent::Frame(SocketFrame::Text(text.as_str().to_string())));
                    }
                    Some(Ok(WsMessage::Binary(bytes))) => {
                        let _ = events.send(SocketEvent::Frame(SocketFrame::Binary(bytes.to_vec())));
                    }
                    Some(Ok(other)) => {
                        let _ = events.send(SocketEvent::Frame(SocketFrame::Other(other.into_data().to_vec())));
                    }
                    Some(Err(err)) => {
                        let _ = events.send(SocketEvent::Error(err.to_string()));
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    if closing {
        // inbound frames after a local close are not delivered
        let drain = async {
            while let Some(Ok(message)) = read.next().await {
                if let WsMessage::Close(frame) = message {
                    return frame.map(CloseInfo::from);
                }
            }
            None
        };
        close_info = tokio::time::timeout(CLOSE_GRACE, drain)
            .await
            .ok()
            .flatten();
    }

    debug!(stream = %path, code = close_info.as_ref().map(|info| info.code), "ws closed");
    let _ = events.send(SocketEvent::Close(close_info));
}
