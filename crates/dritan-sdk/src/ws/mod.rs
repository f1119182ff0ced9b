/*
[INPUT]:  Stream names, credentials placement and subscription commands
[OUTPUT]: Live DEX pool and wallet activity streams
[POS]:    WebSocket layer - real-time data streams
[UPDATE]: When adding new streams or changing connection logic
*/

pub mod client;
pub mod message;
pub mod stream;
pub mod transport;
pub mod wallet;

pub use client::API_KEY_QUERY_PARAM;
pub use message::{
    DexStreamEnvelope, DexStreamPoolPayload, StreamDecimals, StreamLiquidity, StreamMintPair,
    StreamReserves, WalletStreamBalances, WalletStreamCommand, WalletStreamData,
    WalletStreamEnvelope, WalletStreamSide, WalletStreamSolBalance, WalletStreamTokenBalance,
    WalletStreamTokenDelta, WalletStreamVolume,
};
pub use stream::{DritanStream, StreamOptions, StreamPayload, StreamState};
pub use transport::{
    CloseInfo, CredentialPlacement, SocketChannels, SocketCommand, SocketConnector, SocketEvent,
    SocketFrame, SocketRequest, TungsteniteConnector,
};
pub use wallet::{WALLET_STREAM_NAME, WalletStream, WalletStreamOptions};
