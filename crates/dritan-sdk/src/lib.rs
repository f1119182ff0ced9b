/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Dritan SDK crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod http;
pub mod ths;
pub mod types;
pub mod ws;

// Re-export commonly used types from http
pub use http::{
    Capabilities,
    ClientConfig,
    DritanClient,
    DritanError,
    Endpoint,
    HttpTransport,
    ReqwestTransport,
    Result,
    Service,
};

// Re-export the analytics client
pub use ths::{ThsClient, ThsConfig};

// Re-export all types
pub use types::*;

// Re-export commonly used types from ws
pub use ws::{
    CredentialPlacement,
    DexStreamEnvelope,
    DritanStream,
    SocketConnector,
    StreamOptions,
    StreamPayload,
    StreamState,
    TungsteniteConnector,
    WalletStream,
    WalletStreamEnvelope,
    WalletStreamOptions,
};
