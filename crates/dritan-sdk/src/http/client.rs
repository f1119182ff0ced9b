/*
[INPUT]:  Client configuration (API key, base URLs, timeouts, injected transports)
[OUTPUT]: DritanClient ready for REST calls and stream connections
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::http::endpoint::{Capabilities, Endpoint, Service};
use crate::http::request::{HttpRequest, endpoint_url};
use crate::http::transport::{self, HttpTransport, ReqwestTransport};
use crate::http::Result;
use crate::types::LenientPayload;
use crate::ws::{CredentialPlacement, SocketConnector, TungsteniteConnector};

/// Base URLs for the Dritan services
pub const DEFAULT_BASE_URL: &str = "https://us-east.dritan.dev";
pub const DEFAULT_CONTROL_BASE_URL: &str = "https://api.dritan.dev";
pub const DEFAULT_WS_BASE_URL: &str = "wss://us-east.dritan.dev";

/// Header carrying the API key on REST calls and header-authenticated sockets
pub const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client configuration
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub control_base_url: String,
    pub ws_base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Where sockets carry the API key; `None` resolves per runtime
    pub credential_placement: Option<CredentialPlacement>,
    pub capabilities: Capabilities,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_control_base_url(mut self, control_base_url: impl Into<String>) -> Self {
        self.control_base_url = control_base_url.into();
        self
    }

    pub fn with_ws_base_url(mut self, ws_base_url: impl Into<String>) -> Self {
        self.ws_base_url = ws_base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_credential_placement(mut self, placement: CredentialPlacement) -> Self {
        self.credential_placement = Some(placement);
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Credential placement after applying the runtime default
    pub fn resolved_credential_placement(&self) -> CredentialPlacement {
        self.credential_placement
            .unwrap_or_else(CredentialPlacement::runtime_default)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            control_base_url: DEFAULT_CONTROL_BASE_URL.to_string(),
            ws_base_url: DEFAULT_WS_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            credential_placement: None,
            capabilities: Capabilities::all(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("control_base_url", &self.control_base_url)
            .field("ws_base_url", &self.ws_base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("credential_placement", &self.credential_placement)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

/// Main client for the Dritan API
#[derive(Debug, Clone)]
pub struct DritanClient {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
    connector: Arc<dyn SocketConnector>,
}

impl DritanClient {
    /// Create a new client with default configuration
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout, config.connect_timeout)?;
        Ok(Self::with_transports(
            config,
            Arc::new(transport),
            Arc::new(TungsteniteConnector::new()),
        ))
    }

    /// Create a client pointing both HTTP bases at custom URLs (mock servers, proxies)
    pub fn with_config_and_base_urls(
        config: ClientConfig,
        base_url: &str,
        control_base_url: &str,
    ) -> Result<Self> {
        Self::with_config(
            config
                .with_base_url(base_url)
                .with_control_base_url(control_base_url),
        )
    }

    /// Create a client with injected HTTP and socket transports
    pub fn with_transports(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        connector: Arc<dyn SocketConnector>,
    ) -> Self {
        Self {
            config,
            transport,
            connector,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn control_base_url(&self) -> &str {
        &self.config.control_base_url
    }

    pub fn ws_base_url(&self) -> &str {
        &self.config.ws_base_url
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.config.capabilities
    }

    pub(crate) fn connector(&self) -> &dyn SocketConnector {
        self.connector.as_ref()
    }

    /// Build a request for an endpoint, attaching the API key where required
    pub(crate) fn request(&self, endpoint: Endpoint, params: &[&str]) -> Result<HttpRequest> {
        self.config.capabilities.ensure(endpoint)?;

        let base = match endpoint.service() {
            Service::Primary => &self.config.base_url,
            Service::Control => &self.config.control_base_url,
            Service::Ths => {
                return Err(crate::http::DritanError::Config(format!(
                    "{endpoint} is served by the THS analytics client"
                )));
            }
        };

        let url = endpoint_url(base, endpoint, params)?;
        let request = HttpRequest::new(endpoint.method(), url);
        if endpoint.is_authenticated() {
            Ok(request.header(API_KEY_HEADER, self.config.api_key.as_str()))
        } else {
            Ok(request)
        }
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        service: Service,
        request: HttpRequest,
    ) -> Result<T> {
        transport::send_json(self.transport.as_ref(), service, request).await
    }

    pub(crate) async fn send_lenient<T: DeserializeOwned>(
        &self,
        service: Service,
        request: HttpRequest,
    ) -> Result<LenientPayload<T>> {
        transport::send_lenient(self.transport.as_ref(), service, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::DritanError;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::new("key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.control_base_url, DEFAULT_CONTROL_BASE_URL);
        assert_eq!(config.ws_base_url, DEFAULT_WS_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.credential_placement.is_none());
    }

    #[test]
    fn test_config_debug_redacts_api_key() {
        let rendered = format!("{:?}", ClientConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_request_attaches_api_key_for_primary_only() {
        let client = DritanClient::new("key-123").unwrap();

        let request = client.request(Endpoint::TokenPrice, &["MintA"]).unwrap();
        assert_eq!(request.header_value(API_KEY_HEADER), Some("key-123"));
        assert_eq!(
            request.url.as_str(),
            "https://us-east.dritan.dev/token/price/MintA"
        );

        let request = client.request(Endpoint::X402Pricing, &[]).unwrap();
        assert_eq!(request.header_value(API_KEY_HEADER), None);
        assert_eq!(request.url.as_str(), "https://api.dritan.dev/v1/x402/pricing");
    }

    #[test]
    fn test_request_respects_capabilities() {
        let config = ClientConfig::new("key")
            .with_capabilities(Capabilities::all().without(Endpoint::SwapBuild));
        let client = DritanClient::with_config(config).unwrap();

        let err = client.request(Endpoint::SwapBuild, &[]).unwrap_err();
        assert!(matches!(err, DritanError::Unsupported(Endpoint::SwapBuild)));
    }

    #[test]
    fn test_request_rejects_ths_endpoints() {
        let client = DritanClient::new("key").unwrap();
        let err = client.request(Endpoint::ThsHealth, &[]).unwrap_err();
        assert!(matches!(err, DritanError::Config(_)));
    }
}
