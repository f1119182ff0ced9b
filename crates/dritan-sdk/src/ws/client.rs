/*
[INPUT]:  Stream name, StreamOptions and the client's API key / WS base URL
[OUTPUT]: DritanStream / WalletStream connected through the client's SocketConnector
[POS]:    WebSocket layer - stream entry points on DritanClient
[UPDATE]: When changing stream URL construction or credential handling
*/

use tracing::debug;
use url::Url;

use crate::http::{API_KEY_HEADER, DritanClient, DritanError, Result, join_url};
use crate::ws::message::WalletStreamCommand;
use crate::ws::stream::{DritanStream, StreamOptions};
use crate::ws::transport::{CredentialPlacement, SocketRequest};
use crate::ws::wallet::{WALLET_STREAM_NAME, WalletStream, WalletStreamOptions};

/// Query parameter carrying the API key when credentials travel in the URL
pub const API_KEY_QUERY_PARAM: &str = "apiKey";

impl DritanClient {
    /// Open a named stream, typically a `KnownDexStream`; any name is accepted.
    ///
    /// Must be called inside a tokio runtime.
    pub fn stream_dex(&self, dex: impl AsRef<str>, options: StreamOptions) -> Result<DritanStream> {
        let name = dex.as_ref().trim();
        if name.is_empty() {
            return Err(DritanError::Validation("stream name is required".to_string()));
        }
        self.open_stream(name, options, Vec::new())
    }

    /// Open the wallet stream and subscribe the initial wallets once it is open
    pub fn stream_wallets(&self, options: WalletStreamOptions) -> Result<WalletStream> {
        let wallets = options.initial_wallets();
        let mut on_open_commands = Vec::new();
        if !wallets.is_empty() {
            on_open_commands.push(serde_json::to_string(&WalletStreamCommand::subscribe(
                wallets,
            ))?);
        }

        let stream = self.open_stream(WALLET_STREAM_NAME, options.stream, on_open_commands)?;
        Ok(WalletStream::new(stream))
    }

    /// URL and handshake headers for a stream, with credentials placed
    pub(crate) fn stream_request(
        &self,
        name: &str,
        options: &StreamOptions,
    ) -> Result<SocketRequest> {
        let placement = options
            .credential_placement
            .unwrap_or_else(|| self.config().resolved_credential_placement());

        let mut url = Url::parse(&join_url(self.ws_base_url(), name))?;
        let mut query = options.query.clone();
        let mut headers = Vec::new();

        match placement {
            CredentialPlacement::Query => {
                let supplied = query.contains_key(API_KEY_QUERY_PARAM)
                    || url.query_pairs().any(|(key, _)| key == API_KEY_QUERY_PARAM);
                if !supplied {
                    query.set(API_KEY_QUERY_PARAM, self.api_key());
                }
            }
            CredentialPlacement::Header => {
                headers.push((API_KEY_HEADER.to_string(), self.api_key().to_string()));
            }
        }
        query.merge_into(&mut url);

        Ok(SocketRequest { url, headers })
    }

    fn open_stream(
        &self,
        name: &str,
        options: StreamOptions,
        on_open_commands: Vec<String>,
    ) -> Result<DritanStream> {
        let request = self.stream_request(name, &options)?;
        debug!(
            stream = name,
            placement = ?options.credential_placement,
            "opening stream"
        );

        let channels = self.connector().open(request);
        Ok(DritanStream::spawn(
            name,
            channels,
            options.handlers,
            on_open_commands,
        ))
    }
}
