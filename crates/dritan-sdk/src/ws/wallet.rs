/*
[INPUT]:  Wallet addresses and stream options
[OUTPUT]: WalletStream handle with subscription commands
[POS]:    WebSocket layer - wallet-stream control channel
[UPDATE]: When wallet-stream commands change
*/

use tracing::debug;

use crate::ws::message::WalletStreamCommand;
use crate::ws::stream::{DritanStream, StreamOptions, StreamState};

/// Name of the wallet activity stream
pub const WALLET_STREAM_NAME: &str = "wallet-stream";

/// Options for `DritanClient::stream_wallets`
#[derive(Debug, Default)]
pub struct WalletStreamOptions {
    /// Subscribed once the socket opens; blank entries are dropped
    pub wallets: Vec<String>,
    pub stream: StreamOptions,
}

impl WalletStreamOptions {
    pub fn new<I, S>(wallets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            wallets: wallets.into_iter().map(Into::into).collect(),
            stream: StreamOptions::default(),
        }
    }

    pub fn with_stream(mut self, stream: StreamOptions) -> Self {
        self.stream = stream;
        self
    }

    /// Trimmed, non-empty initial wallets
    pub(crate) fn initial_wallets(&self) -> Vec<String> {
        self.wallets
            .iter()
            .map(|wallet| wallet.trim())
            .filter(|wallet| !wallet.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Wallet stream handle
#[derive(Debug)]
pub struct WalletStream {
    stream: DritanStream,
}

impl WalletStream {
    pub(crate) fn new(stream: DritanStream) -> Self {
        Self { stream }
    }

    pub fn stream(&self) -> &DritanStream {
        &self.stream
    }

    pub fn into_inner(self) -> DritanStream {
        self.stream
    }

    pub fn state(&self) -> StreamState {
        self.stream.state()
    }

    pub fn close(&self) {
        self.stream.close();
    }

    pub async fn join(self) {
        self.stream.join().await;
    }

    pub fn subscribe_wallets<I, S>(&self, wallets: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.send_command(WalletStreamCommand::subscribe(
            wallets.into_iter().map(Into::into).collect(),
        ));
    }

    pub fn unsubscribe_wallets<I, S>(&self, wallets: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.send_command(WalletStreamCommand::unsubscribe(
            wallets.into_iter().map(Into::into).collect(),
        ));
    }

    pub fn list_subscriptions(&self) {
        self.send_command(WalletStreamCommand::list_subscriptions());
    }

    fn send_command(&self, command: WalletStreamCommand) {
        if let Err(err) = self.stream.send_json(&command) {
            debug!(method = ?command.method, error = %err, "wallet stream command dropped");
        }
    }
}
