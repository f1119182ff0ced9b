/*
[INPUT]:  SocketChannels from a connector plus user handlers
[OUTPUT]: DritanStream handle; normalized payloads delivered to handlers in order
[POS]:    WebSocket layer - stream lifecycle and dispatch
[UPDATE]: When changing stream states, payload normalization or handler semantics
*/

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::http::{DritanError, QueryParams, Result};
use crate::ws::transport::{
    CloseInfo, CredentialPlacement, SocketChannels, SocketCommand, SocketEvent, SocketFrame,
};

const PARSE_FAIL_LOG_LIMIT: usize = 3;
const RAW_LOG_MAX_BYTES: usize = 1024;

static PARSE_FAIL_LOG_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Normalized inbound message
#[derive(Debug, Clone, PartialEq)]
pub enum StreamPayload {
    Json(Value),
    /// Text that is not valid JSON
    Text(String),
    /// Binary data that is not valid UTF-8, or a non-data frame
    Binary(Vec<u8>),
}

impl StreamPayload {
    pub fn from_frame(frame: SocketFrame) -> Self {
        match frame {
            SocketFrame::Text(text) => Self::from_text(text),
            SocketFrame::Binary(bytes) => match String::from_utf8(bytes) {
                Ok(text) => Self::from_text(text),
                Err(err) => StreamPayload::Binary(err.into_bytes()),
            },
            SocketFrame::Other(bytes) => StreamPayload::Binary(bytes),
        }
    }

    fn from_text(text: String) -> Self {
        if text.is_empty() {
            return StreamPayload::Text(text);
        }
        match serde_json::from_str(&text) {
            Ok(value) => StreamPayload::Json(value),
            Err(err) => {
                log_parse_fail_once(&err, &text);
                StreamPayload::Text(text)
            }
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            StreamPayload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StreamPayload::Text(text) => Some(text),
            _ => None,
        }
    }

    /// `type` field of a JSON object payload
    pub fn message_type(&self) -> Option<&str> {
        self.as_json()?.get("type")?.as_str()
    }

    /// Decode a JSON payload into a typed envelope
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        match self {
            StreamPayload::Json(value) => Ok(T::deserialize(value)?),
            StreamPayload::Text(text) => Ok(serde_json::from_str(text)?),
            StreamPayload::Binary(bytes) => Err(DritanError::WebSocket(format!(
                "cannot decode {} byte binary payload",
                bytes.len()
            ))),
        }
    }
}

type OpenHandler = Box<dyn FnMut() + Send>;
type MessageHandler = Box<dyn FnMut(StreamPayload) + Send>;
type ErrorHandler = Box<dyn FnMut(DritanError) + Send>;
type CloseHandler = Box<dyn FnMut(Option<CloseInfo>) + Send>;

#[derive(Default)]
pub(crate) struct StreamHandlers {
    on_open: Option<OpenHandler>,
    on_message: Option<MessageHandler>,
    on_error: Option<ErrorHandler>,
    on_close: Option<CloseHandler>,
}

/// Per-stream settings and callbacks
#[derive(Default)]
pub struct StreamOptions {
    /// Extra query parameters on the stream URL
    pub query: QueryParams,
    /// Overrides the client-level placement
    pub credential_placement: Option<CredentialPlacement>,
    pub(crate) handlers: StreamHandlers,
}

impl StreamOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.set(key, value);
        self
    }

    pub fn with_credential_placement(mut self, placement: CredentialPlacement) -> Self {
        self.credential_placement = Some(placement);
        self
    }

    /// Runs before the stream reports `Open`; sends from inside it are rejected
    pub fn on_open(mut self, handler: impl FnMut() + Send + 'static) -> Self {
        self.handlers.on_open = Some(Box::new(handler));
        self
    }

    pub fn on_message(mut self, handler: impl FnMut(StreamPayload) + Send + 'static) -> Self {
        self.handlers.on_message = Some(Box::new(handler));
        self
    }

    pub fn on_error(mut self, handler: impl FnMut(DritanError) + Send + 'static) -> Self {
        self.handlers.on_error = Some(Box::new(handler));
        self
    }

    pub fn on_close(mut self, handler: impl FnMut(Option<CloseInfo>) + Send + 'static) -> Self {
        self.handlers.on_close = Some(Box::new(handler));
        self
    }
}

impl fmt::Debug for StreamOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamOptions")
            .field("query", &self.query.len())
            .field("credential_placement", &self.credential_placement)
            .field("on_open", &self.handlers.on_open.is_some())
            .field("on_message", &self.handlers.on_message.is_some())
            .field("on_error", &self.handlers.on_error.is_some())
            .field("on_close", &self.handlers.on_close.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Connecting,
    Open,
    Closing,
    Closed,
}

impl StreamState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => StreamState::Connecting,
            1 => StreamState::Open,
            2 => StreamState::Closing,
            _ => StreamState::Closed,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            StreamState::Connecting => 0,
            StreamState::Open => 1,
            StreamState::Closing => 2,
            StreamState::Closed => 3,
        }
    }
}

/// Handle to one live stream connection.
///
/// Dropping the handle closes the socket.
#[derive(Debug)]
pub struct DritanStream {
    name: String,
    state: Arc<AtomicU8>,
    commands: mpsc::UnboundedSender<SocketCommand>,
    dispatch: JoinHandle<()>,
}

impl DritanStream {
    /// Start dispatching socket events; `on_open_commands` are sent after the user `on_open`
    pub(crate) fn spawn(
        name: impl Into<String>,
        channels: SocketChannels,
        handlers: StreamHandlers,
        on_open_commands: Vec<String>,
    ) -> Self {
        let name = name.into();
        let state = Arc::new(AtomicU8::new(StreamState::Connecting.as_u8()));
        let SocketChannels { events, commands } = channels;

        let dispatch = tokio::spawn(dispatch_events(
            name.clone(),
            events,
            state.clone(),
            handlers,
            on_open_commands,
            commands.downgrade(),
        ));

        Self {
            name,
            state,
            commands,
            dispatch,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> StreamState {
        StreamState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_open(&self) -> bool {
        self.state() == StreamState::Open
    }

    /// Send a text frame; fails unless the stream is open
    pub fn send_text(&self, text: impl Into<String>) -> Result<()> {
        if !self.is_open() {
            return Err(DritanError::WebSocket(format!(
                "stream {} is not open ({:?})",
                self.name,
                self.state()
            )));
        }
        self.commands
            .send(SocketCommand::Text(text.into()))
            .map_err(|_| DritanError::WebSocket(format!("stream {} is closed", self.name)))
    }

    pub fn send_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        self.send_text(serde_json::to_string(value)?)
    }

    /// Request a close; repeated calls are no-ops
    pub fn close(&self) {
        let transition = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                match StreamState::from_u8(current) {
                    StreamState::Connecting | StreamState::Open => {
                        Some(StreamState::Closing.as_u8())
                    }
                    StreamState::Closing | StreamState::Closed => None,
                }
            });
        if transition.is_ok() {
            debug!(stream = %self.name, "closing stream");
            let _ = self.commands.send(SocketCommand::Close);
        }
    }

    /// Wait until the stream has closed and every handler has run
    pub async fn join(self) {
        let DritanStream {
            name,
            commands,
            dispatch,
            ..
        } = self;
        if let Err(err) = dispatch.await {
            debug!(stream = %name, error = %err, "stream dispatch task ended abnormally");
        }
        drop(commands);
    }
}

async fn dispatch_events(
    name: String,
    mut events: mpsc::UnboundedReceiver<SocketEvent>,
    state: Arc<AtomicU8>,
    mut handlers: StreamHandlers,
    on_open_commands: Vec<String>,
    commands: mpsc::WeakUnboundedSender<SocketCommand>,
) {
    let mut on_open_commands = Some(on_open_commands);

    while let Some(event) = events.recv().await {
        match event {
            SocketEvent::Open => {
                info!(stream = %name, "stream open");
                if let Some(handler) = handlers.on_open.as_mut() {
                    handler();
                }
                for command in on_open_commands.take().unwrap_or_default() {
                    let sent = commands
                        .upgrade()
                        .is_some_and(|tx| tx.send(SocketCommand::Text(command)).is_ok());
                    if !sent {
                        debug!(stream = %name, "stream gone before open command was sent");
                    }
                }
                // published last: caller sends must queue behind the open commands
                let _ = state.compare_exchange(
                    StreamState::Connecting.as_u8(),
                    StreamState::Open.as_u8(),
                    Ordering::AcqRel,
                    Ordering::Acquire,
                );
            }
            SocketEvent::Frame(frame) => {
                if let Some(handler) = handlers.on_message.as_mut() {
                    handler(StreamPayload::from_frame(frame));
                }
            }
            SocketEvent::Error(message) => {
                warn!(stream = %name, error = %message, "stream error");
                if let Some(handler) = handlers.on_error.as_mut() {
                    handler(DritanError::WebSocket(message));
                }
            }
            SocketEvent::Close(info) => {
                state.store(StreamState::Closed.as_u8(), Ordering::Release);
                info!(
                    stream = %name,
                    code = info.as_ref().map(|info| info.code),
                    "stream closed"
                );
                if let Some(handler) = handlers.on_close.as_mut() {
                    handler(info);
                }
                break;
            }
        }
    }

    state.store(StreamState::Closed.as_u8(), Ordering::Release);
}

fn log_parse_fail_once(err: &serde_json::Error, raw: &str) {
    let count = PARSE_FAIL_LOG_COUNT.fetch_add(1, Ordering::Relaxed);
    if count < PARSE_FAIL_LOG_LIMIT {
        info!(
            sample_index = count + 1,
            sample_limit = PARSE_FAIL_LOG_LIMIT,
            error = %err,
            bytes = raw.len(),
            "stream payload is not json, delivering text"
        );
        let preview = truncate_for_log(raw, RAW_LOG_MAX_BYTES);
        debug!(
            sample_index = count + 1,
            sample_limit = PARSE_FAIL_LOG_LIMIT,
            message = %preview,
            "stream payload is not json, delivering text"
        );
    }
}

fn truncate_for_log(value: &str, max_len: usize) -> String {
    if value.len() <= max_len {
        return value.to_string();
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &value[..end])
}
