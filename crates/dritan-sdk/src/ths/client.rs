/*
[INPUT]:  ThsConfig (base URL, timeouts) or an injected HttpTransport
[OUTPUT]: ThsResponse / ThsTopWalletsResponse
[POS]:    THS layer - analytics client
[UPDATE]: When THS request/response format changes
*/

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::http::endpoint::{Endpoint, Service};
use crate::http::request::{HttpRequest, QueryParams, endpoint_url, require_non_empty};
use crate::http::transport::{self, HttpTransport, ReqwestTransport};
use crate::http::Result;
use crate::types::{ThsOptions, ThsResponse, ThsTokensRequest, ThsTopWalletsResponse, TopWalletsOptions};

pub const DEFAULT_THS_BASE_URL: &str = "https://ths.dritan.dev";

/// Analytics client configuration
#[derive(Debug, Clone)]
pub struct ThsConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl ThsConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for ThsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_THS_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Client for the wallet trading-health score service
#[derive(Debug, Clone)]
pub struct ThsClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl ThsClient {
    pub fn new() -> Result<Self> {
        Self::with_config(ThsConfig::default())
    }

    pub fn with_config(config: ThsConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout, config.connect_timeout)?;
        Ok(Self::with_transport(config.base_url, Arc::new(transport)))
    }

    pub fn with_transport(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, endpoint: Endpoint, params: &[&str]) -> Result<HttpRequest> {
        let url = endpoint_url(&self.base_url, endpoint, params)?;
        Ok(HttpRequest::new(endpoint.method(), url))
    }

    /// `true` only when the service answers 2xx; every failure maps to `false`
    ///
    /// GET /health
    pub async fn health(&self) -> bool {
        let request = match self.request(Endpoint::ThsHealth, &[]) {
            Ok(request) => request,
            Err(err) => {
                debug!(error = %err, "ths health request could not be built");
                return false;
            }
        };
        match self.transport.execute(request).await {
            Ok(response) => response.is_success(),
            Err(err) => {
                debug!(error = %err, "ths health check failed");
                false
            }
        }
    }

    /// GET /ths/{wallet}?debug=1&breakdown=1
    pub async fn get_ths_score(&self, wallet: &str, options: &ThsOptions) -> Result<ThsResponse> {
        let wallet = require_non_empty("wallet", wallet)?;

        let mut params = QueryParams::new();
        options.apply(&mut params);

        let request = self.request(Endpoint::ThsScore, &[wallet])?.query(&params);
        transport::send_json(self.transport.as_ref(), Service::Ths, request).await
    }

    /// Score restricted to the given mints, passed as repeated `tokenMints` parameters
    ///
    /// GET /ths/{wallet}/tokens?tokenMints=..&tokenMints=..
    pub async fn get_ths_score_for_tokens(
        &self,
        wallet: &str,
        token_mints: &[String],
        options: &ThsOptions,
    ) -> Result<ThsResponse> {
        let wallet = require_non_empty("wallet", wallet)?;

        let mut params = QueryParams::new();
        for mint in token_mints {
            params.append("tokenMints", mint);
        }
        options.apply(&mut params);

        let request = self
            .request(Endpoint::ThsScoreForTokens, &[wallet])?
            .query(&params);
        transport::send_json(self.transport.as_ref(), Service::Ths, request).await
    }

    /// Same as `get_ths_score_for_tokens`, with the mints in a JSON body
    ///
    /// POST /ths/{wallet}/tokens
    pub async fn post_ths_score_for_tokens(
        &self,
        wallet: &str,
        token_mints: &[String],
        options: &ThsOptions,
    ) -> Result<ThsResponse> {
        let wallet = require_non_empty("wallet", wallet)?;

        let mut params = QueryParams::new();
        options.apply(&mut params);
        let body = ThsTokensRequest {
            token_mints: token_mints.to_vec(),
        };

        let request = self
            .request(Endpoint::ThsScoreForTokensPost, &[wallet])?
            .query(&params)
            .json(&body)?;
        transport::send_json(self.transport.as_ref(), Service::Ths, request).await
    }

    /// GET /ths/top-wallets?page={page}&limit={limit}
    pub async fn get_top_wallets_by_score(
        &self,
        options: &TopWalletsOptions,
    ) -> Result<ThsTopWalletsResponse> {
        let mut params = QueryParams::new();
        params
            .set_opt("page", options.page)
            .set_opt("limit", options.limit);

        let request = self.request(Endpoint::ThsTopWallets, &[])?.query(&params);
        transport::send_json(self.transport.as_ref(), Service::Ths, request).await
    }
}
