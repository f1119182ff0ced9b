/*
[INPUT]:  Operation identifiers used by the HTTP clients
[OUTPUT]: Endpoint registry (method, service, path template, auth) and capability sets
[POS]:    HTTP layer - single source of truth for the REST surface
[UPDATE]: When the remote service adds, removes or moves an endpoint
*/

use std::collections::BTreeSet;
use std::fmt;

use reqwest::Method;

use crate::http::{DritanError, Result};

/// Remote service an endpoint lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Market data, wallet analytics and swaps (`x-api-key` required)
    Primary,
    /// Key provisioning control plane
    Control,
    /// Wallet scoring analytics service
    Ths,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Primary | Service::Control => f.write_str("Dritan"),
            Service::Ths => f.write_str("Meteora THS"),
        }
    }
}

/// Every REST operation the SDK knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Endpoint {
    TokenSearch,
    TokenPrice,
    TokenMetadata,
    TokenRisk,
    TokenFirstBuyers,
    TokenAggregated,
    TokenDeployerStats,
    TokenOhlcv,
    WalletPerformance,
    WalletTokenPerformance,
    WalletPortfolioChart,
    WalletSummary,
    WalletTradeHistory,
    WalletHoldings,
    WalletHoldingsPage,
    SwapBuild,
    SwapBroadcast,
    X402Pricing,
    X402ApiKeyQuote,
    X402ApiKeyCreate,
    ThsHealth,
    ThsScore,
    ThsScoreForTokens,
    ThsScoreForTokensPost,
    ThsTopWallets,
}

impl Endpoint {
    pub const ALL: [Endpoint; 25] = [
        Endpoint::TokenSearch,
        Endpoint::TokenPrice,
        Endpoint::TokenMetadata,
        Endpoint::TokenRisk,
        Endpoint::TokenFirstBuyers,
        Endpoint::TokenAggregated,
        Endpoint::TokenDeployerStats,
        Endpoint::TokenOhlcv,
        Endpoint::WalletPerformance,
        Endpoint::WalletTokenPerformance,
        Endpoint::WalletPortfolioChart,
        Endpoint::WalletSummary,
        Endpoint::WalletTradeHistory,
        Endpoint::WalletHoldings,
        Endpoint::WalletHoldingsPage,
        Endpoint::SwapBuild,
        Endpoint::SwapBroadcast,
        Endpoint::X402Pricing,
        Endpoint::X402ApiKeyQuote,
        Endpoint::X402ApiKeyCreate,
        Endpoint::ThsHealth,
        Endpoint::ThsScore,
        Endpoint::ThsScoreForTokens,
        Endpoint::ThsScoreForTokensPost,
        Endpoint::ThsTopWallets,
    ];

    pub fn method(self) -> Method {
        match self {
            Endpoint::SwapBuild
            | Endpoint::SwapBroadcast
            | Endpoint::X402ApiKeyQuote
            | Endpoint::X402ApiKeyCreate
            | Endpoint::ThsScoreForTokensPost => Method::POST,
            _ => Method::GET,
        }
    }

    pub fn service(self) -> Service {
        match self {
            Endpoint::X402Pricing | Endpoint::X402ApiKeyQuote | Endpoint::X402ApiKeyCreate => {
                Service::Control
            }
            Endpoint::ThsHealth
            | Endpoint::ThsScore
            | Endpoint::ThsScoreForTokens
            | Endpoint::ThsScoreForTokensPost
            | Endpoint::ThsTopWallets => Service::Ths,
            _ => Service::Primary,
        }
    }

    /// Path template; `{name}` segments are filled positionally and percent-encoded
    pub fn path_template(self) -> &'static str {
        match self {
            Endpoint::TokenSearch => "/token/search",
            Endpoint::TokenPrice => "/token/price/{mint}",
            Endpoint::TokenMetadata => "/token/metadata/{mint}",
            Endpoint::TokenRisk => "/token/risk/{mint}",
            Endpoint::TokenFirstBuyers => "/token/first-buyers/{mint}",
            Endpoint::TokenAggregated => "/token/aggregated/{mint}",
            Endpoint::TokenDeployerStats => "/token/deployer-stats/{mint}",
            Endpoint::TokenOhlcv => "/token/ohlcv/{mint}/{timeframe}",
            Endpoint::WalletPerformance => "/wallet/performance/{wallet}",
            Endpoint::WalletTokenPerformance => "/wallet/performance/{wallet}/{mint}",
            Endpoint::WalletPortfolioChart => "/wallet/portfolio-chart/{wallet}",
            Endpoint::WalletSummary => "/wallet/summary/{wallet}",
            Endpoint::WalletTradeHistory => "/wallet/trade-history/{wallet}",
            Endpoint::WalletHoldings => "/wallet/holdings/{wallet}",
            Endpoint::WalletHoldingsPage => "/wallet/holdings/{wallet}/page/{page}",
            Endpoint::SwapBuild => "/swap/build",
            Endpoint::SwapBroadcast => "/swap/broadcast",
            Endpoint::X402Pricing => "/v1/x402/pricing",
            Endpoint::X402ApiKeyQuote => "/v1/x402/api-keys/quote",
            Endpoint::X402ApiKeyCreate => "/v1/x402/api-keys",
            Endpoint::ThsHealth => "/health",
            Endpoint::ThsScore => "/ths/{wallet}",
            Endpoint::ThsScoreForTokens | Endpoint::ThsScoreForTokensPost => {
                "/ths/{wallet}/tokens"
            }
            Endpoint::ThsTopWallets => "/ths/top-wallets",
        }
    }

    /// Whether the `x-api-key` header is attached
    pub fn is_authenticated(self) -> bool {
        self.service() == Service::Primary
    }

    /// Number of `{name}` placeholders in the path template
    pub fn path_param_count(self) -> usize {
        self.path_template()
            .split('/')
            .filter(|segment| segment.starts_with('{'))
            .count()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path_template())
    }
}

/// Set of endpoints a client instance exposes.
///
/// Older deployments of the service do not carry every endpoint; restricting
/// the set turns calls to missing endpoints into `DritanError::Unsupported`
/// without touching the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    enabled: BTreeSet<Endpoint>,
}

impl Capabilities {
    pub fn all() -> Self {
        Self::only(Endpoint::ALL)
    }

    pub fn none() -> Self {
        Self {
            enabled: BTreeSet::new(),
        }
    }

    pub fn only(endpoints: impl IntoIterator<Item = Endpoint>) -> Self {
        Self {
            enabled: endpoints.into_iter().collect(),
        }
    }

    pub fn with(mut self, endpoint: Endpoint) -> Self {
        self.enabled.insert(endpoint);
        self
    }

    pub fn without(mut self, endpoint: Endpoint) -> Self {
        self.enabled.remove(&endpoint);
        self
    }

    pub fn supports(&self, endpoint: Endpoint) -> bool {
        self.enabled.contains(&endpoint)
    }

    pub fn ensure(&self, endpoint: Endpoint) -> Result<()> {
        if self.supports(endpoint) {
            Ok(())
        } else {
            Err(DritanError::Unsupported(endpoint))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Endpoint> + '_ {
        self.enabled.iter().copied()
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}
