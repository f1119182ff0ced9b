/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod endpoint;
pub mod error;
pub mod request;
pub mod swap;
pub mod token;
pub mod transport;
pub mod wallet;
pub mod x402;

pub use error::{DritanError, Result};

pub use client::{
    API_KEY_HEADER, ClientConfig, DEFAULT_BASE_URL, DEFAULT_CONTROL_BASE_URL, DEFAULT_WS_BASE_URL,
    DritanClient,
};
pub use endpoint::{Capabilities, Endpoint, Service};
pub use request::{HttpRequest, QueryParams, endpoint_url, join_url};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
